use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::browser::Browser as Chromium;
use chromiumoxide::browser::BrowserConfig as ChromiumConfig;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, Headers as CdpHeaders, ResourceType,
};
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::app::{CancellationToken, ProwlError, Result};
use crate::browser::{BrowserDriver, FetchResult};
use crate::config::{BrowserConfig, BrowserKind, RunConfig, DEFAULT_WAIT_UNTIL};
use crate::domain::Headers;

struct Engine {
    browser: Arc<Chromium>,
    handler: JoinHandle<()>,
}

/// Chromium driver speaking the Chrome DevTools Protocol.
///
/// The engine handle lives behind a lock; `start` and `close` mutate it
/// atomically while `fetch_html` snapshots it and navigates without holding
/// the lock, so concurrent fetches each get their own isolated page.
pub struct CdpBrowser {
    cfg: BrowserConfig,
    engine: Mutex<Option<Engine>>,
}

impl CdpBrowser {
    pub fn new(cfg: BrowserConfig) -> Self {
        Self {
            cfg,
            engine: Mutex::new(None),
        }
    }

    fn launch_config(&self) -> Result<ChromiumConfig> {
        let mut builder = ChromiumConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .window_size(self.cfg.viewport_width, self.cfg.viewport_height);

        if !self.cfg.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = self.cfg.executable {
            builder = builder.chrome_executable(path);
        }

        if let Some(ref proxy) = self.cfg.proxy {
            if !proxy.server.is_empty() {
                builder = builder.arg(format!("--proxy-server={}", proxy.server));
            }
            if proxy.username.is_some() {
                tracing::warn!("proxy credentials are not supported by the CDP driver; ignoring");
            }
        }

        if let Some(port) = self.cfg.debugging_port {
            builder = builder.arg(format!("--remote-debugging-port={port}"));
        }

        for arg in &self.cfg.extra_args {
            builder = builder.arg(arg.as_str());
        }

        builder.build().map_err(ProwlError::LaunchFailed)
    }

    async fn fetch_on_page(
        &self,
        page: &Page,
        url: &str,
        cfg: &RunConfig,
        cancel: &CancellationToken,
    ) -> Result<FetchResult> {
        if !self.cfg.user_agent.is_empty() {
            page.set_user_agent(&self.cfg.user_agent)
                .await
                .map_err(|e| ProwlError::NavigationFailed(format!("failed to set user agent: {e}")))?;
        }

        // Subscribe to network responses before navigating so the main
        // document response is not missed.
        if let Err(e) = page.execute(EnableParams::default()).await {
            tracing::debug!("could not enable network events: {e}");
        }
        let mut responses = page.event_listener::<EventResponseReceived>().await.ok();

        let timeout = cfg.page_timeout();
        match tokio::time::timeout(timeout, navigate(page, url, &cfg.wait_until)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(ProwlError::Timeout(timeout.as_millis() as u64)),
        }

        if let Some(selector) = cfg.wait_for.as_deref() {
            wait_for_selector(page, selector, cfg.wait_for_timeout()).await?;
        }

        if cancel.is_cancelled() {
            return Err(ProwlError::Cancelled);
        }

        let (status_code, response_headers) = match responses.as_mut() {
            Some(stream) => main_document_response(stream).await,
            None => (0, Headers::new()),
        };

        let html = page
            .content()
            .await
            .map_err(|e| ProwlError::NavigationFailed(format!("failed to read page content: {e}")))?;

        let redirected_url = page
            .url()
            .await
            .map_err(|e| ProwlError::NavigationFailed(format!("failed to read page url: {e}")))?
            .filter(|u| !u.is_empty() && u != "about:blank");

        Ok(FetchResult {
            html,
            status_code,
            redirected_url,
            response_headers,
        })
    }
}

#[async_trait::async_trait]
impl BrowserDriver for CdpBrowser {
    async fn start(&self) -> Result<()> {
        let mut engine = self.engine.lock().await;
        if engine.is_some() {
            return Ok(());
        }

        // Only Chromium-family engines speak CDP.
        if self.cfg.kind != BrowserKind::Chromium {
            return Err(ProwlError::EngineUnsupported(self.cfg.kind.to_string()));
        }

        let config = self.launch_config()?;
        let (browser, mut handler) = Chromium::launch(config).await.map_err(|e| {
            ProwlError::LaunchFailed(format!(
                "{e}. Is Chrome or Chromium installed and in PATH?"
            ))
        })?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler stopped: {e}");
                    break;
                }
            }
        });

        tracing::info!(kind = %self.cfg.kind, headless = self.cfg.headless, "browser engine started");
        *engine = Some(Engine {
            browser: Arc::new(browser),
            handler: handler_task,
        });
        Ok(())
    }

    async fn fetch_html(
        &self,
        url: &str,
        cfg: &RunConfig,
        cancel: &CancellationToken,
    ) -> Result<FetchResult> {
        let browser = {
            let engine = self.engine.lock().await;
            match engine.as_ref() {
                Some(engine) => Arc::clone(&engine.browser),
                None => return Err(ProwlError::NotStarted),
            }
        };

        let cfg = cfg.normalized();
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProwlError::NavigationFailed(format!("failed to open page: {e}")))?;

        let outcome = self.fetch_on_page(&page, url, &cfg, cancel).await;

        if let Err(e) = page.close().await {
            tracing::debug!("page close failed: {e}");
        }
        outcome
    }

    async fn close(&self) -> Result<()> {
        let engine = self.engine.lock().await.take();
        let Some(engine) = engine else {
            return Ok(());
        };

        engine.handler.abort();
        match Arc::try_unwrap(engine.browser) {
            Ok(mut browser) => {
                browser
                    .close()
                    .await
                    .map_err(|e| ProwlError::Shutdown(e.to_string()))?;
                let _ = browser.wait().await;
            }
            Err(_) => {
                // A fetch still holds the handle; the process exits when the
                // last reference drops.
                tracing::warn!("browser engine still in use at close");
            }
        }
        tracing::info!("browser engine closed");
        Ok(())
    }
}

async fn navigate(page: &Page, url: &str, wait_until: &str) -> Result<()> {
    let wait_for_lifecycle = lifecycle_wait(wait_until)?;

    page.goto(url)
        .await
        .map_err(|e| ProwlError::NavigationFailed(e.to_string()))?;

    // goto resolves once the frame has navigated; the heavier readiness
    // conditions also wait for the page's load lifecycle to finish.
    if wait_for_lifecycle {
        page.wait_for_navigation()
            .await
            .map_err(|e| ProwlError::NavigationFailed(e.to_string()))?;
    }
    Ok(())
}

/// Maps a readiness condition to whether the page's load lifecycle must be
/// awaited after navigation. Unknown condition names are rejected rather
/// than silently treated as one of the known ones.
fn lifecycle_wait(wait_until: &str) -> Result<bool> {
    match wait_until {
        DEFAULT_WAIT_UNTIL => Ok(false),
        "load" | "networkidle" => Ok(true),
        other => Err(ProwlError::NavigationFailed(format!(
            "unknown wait condition {other:?}"
        ))),
    }
}

async fn wait_for_selector(page: &Page, selector: &str, budget: Duration) -> Result<()> {
    tokio::time::timeout(budget, async {
        loop {
            if page.find_element(selector).await.is_ok() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    })
    .await
    .map_err(|_| ProwlError::Timeout(budget.as_millis() as u64))
}

/// Picks the main document response out of the network event stream.
///
/// Navigation has already settled when this runs, so the event is either
/// buffered or never coming; a short grace period bounds the wait.
async fn main_document_response<S>(stream: &mut S) -> (u16, Headers)
where
    S: Stream<Item = Arc<EventResponseReceived>> + Unpin,
{
    let grace = tokio::time::sleep(Duration::from_millis(500));
    tokio::pin!(grace);

    loop {
        tokio::select! {
            event = stream.next() => {
                let Some(event) = event else { break };
                if event.r#type == ResourceType::Document {
                    let status = u16::try_from(event.response.status).unwrap_or(0);
                    return (status, merge_headers(&event.response.headers));
                }
            }
            () = &mut grace => break,
        }
    }
    (0, Headers::new())
}

/// Lowercases header names and merges repeats case-insensitively. CDP joins
/// duplicate headers with newlines; those become separate values.
fn merge_headers(headers: &CdpHeaders) -> Headers {
    let mut merged = Headers::new();
    let Ok(serde_json::Value::Object(map)) = serde_json::to_value(headers) else {
        return merged;
    };
    for (name, value) in map {
        let entry = merged.entry(name.to_ascii_lowercase()).or_default();
        match value {
            serde_json::Value::String(joined) => {
                entry.extend(joined.split('\n').map(str::to_string));
            }
            other => entry.push(other.to_string()),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;

    #[tokio::test]
    async fn test_fetch_before_start_fails() {
        let driver = CdpBrowser::new(BrowserConfig::default());
        let err = driver
            .fetch_html("https://example.com", &RunConfig::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProwlError::NotStarted));
    }

    #[tokio::test]
    async fn test_start_rejects_non_chromium_engines() {
        let cfg = BrowserConfig {
            kind: BrowserKind::Firefox,
            ..BrowserConfig::default()
        };
        let driver = CdpBrowser::new(cfg);
        let err = driver.start().await.unwrap_err();
        assert!(matches!(err, ProwlError::EngineUnsupported(_)));
    }

    #[tokio::test]
    async fn test_close_without_start_is_noop() {
        let driver = CdpBrowser::new(BrowserConfig::default());
        assert!(driver.close().await.is_ok());
        assert!(driver.close().await.is_ok());
    }

    #[test]
    fn test_launch_config_includes_proxy_and_extra_args() {
        // An explicit executable keeps the builder from probing the host for
        // an installed Chrome.
        let cfg = BrowserConfig {
            executable: Some(std::path::PathBuf::from("/usr/bin/chromium")),
            proxy: Some(ProxyConfig {
                server: "http://myproxy:3128".to_string(),
                ..ProxyConfig::default()
            }),
            extra_args: vec!["--lang=en-US".to_string()],
            debugging_port: Some(9222),
            ..BrowserConfig::default()
        };
        let driver = CdpBrowser::new(cfg);
        assert!(driver.launch_config().is_ok());
    }

    #[test]
    fn test_known_wait_conditions() {
        assert!(!lifecycle_wait("domcontentloaded").unwrap());
        assert!(lifecycle_wait("load").unwrap());
        assert!(lifecycle_wait("networkidle").unwrap());
    }

    #[test]
    fn test_unknown_wait_condition_rejected() {
        let err = lifecycle_wait("bogus").unwrap_err();
        assert!(matches!(err, ProwlError::NavigationFailed(_)));
    }

    #[test]
    fn test_merge_headers_is_case_insensitive() {
        let raw = serde_json::json!({
            "Content-Type": "text/html",
            "content-type": "text/html; charset=utf-8",
            "Set-Cookie": "a=1\nb=2",
        });
        let merged = merge_headers(&CdpHeaders::new(raw));
        assert_eq!(merged["content-type"].len(), 2);
        assert_eq!(merged["set-cookie"], vec!["a=1".to_string(), "b=2".to_string()]);
    }

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_fetch_real_page() {
        let driver = CdpBrowser::new(BrowserConfig::default());
        driver.start().await.unwrap();

        let result = driver
            .fetch_html("https://example.com", &RunConfig::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(result.html.contains("<html"));
        assert_eq!(result.status_code, 200);

        driver.close().await.unwrap();
    }
}
