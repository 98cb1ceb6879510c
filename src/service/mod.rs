//! Crawl orchestration.
//!
//! [`CrawlService`] owns the browser driver's lifecycle and sequences one
//! crawl: validate, fetch, extract, assemble. Every failure path still
//! yields a structured [`CrawlResult`] so callers can inspect whatever was
//! captured before the failure point.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::app::{CancellationToken, ProwlError, Result};
use crate::browser::{BrowserDriver, FetchResult};
use crate::config::RunConfig;
use crate::domain::{CrawlFailure, CrawlResult};
use crate::extract;

#[derive(Default)]
struct State {
    ready: bool,
    closed: bool,
}

/// Owns one browser driver: lazy start, idempotent close, per-crawl runs.
///
/// The readiness state sits behind a lock taken only around transitions;
/// navigation itself runs without it, so concurrent crawls against one
/// service proceed in parallel.
pub struct CrawlService {
    driver: Arc<dyn BrowserDriver>,
    state: Mutex<State>,
}

impl CrawlService {
    pub fn new(driver: Arc<dyn BrowserDriver>) -> Self {
        Self {
            driver,
            state: Mutex::new(State::default()),
        }
    }

    /// Starts the underlying driver. Idempotent while the service is open;
    /// fails with `NotReady` once the service has been closed.
    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(ProwlError::NotReady);
        }
        if state.ready {
            return Ok(());
        }
        self.driver.start().await?;
        state.ready = true;
        Ok(())
    }

    /// Fetches one page, lazily starting the driver on first use.
    pub async fn fetch_html(
        &self,
        url: &str,
        cfg: &RunConfig,
        cancel: &CancellationToken,
    ) -> Result<FetchResult> {
        if url.is_empty() {
            return Err(ProwlError::InvalidUrl);
        }

        self.start().await?;
        {
            let state = self.state.lock().await;
            if !state.ready {
                return Err(ProwlError::NotReady);
            }
        }

        let cfg = cfg.normalized();
        self.driver.fetch_html(url, &cfg, cancel).await
    }

    /// Closes the service. Idempotent; a never-started close is a no-op. A
    /// closed service stays closed: later runs fail instead of relaunching.
    pub async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        if !state.ready {
            return Ok(());
        }
        self.driver.close().await?;
        state.ready = false;
        Ok(())
    }

    /// Runs one crawl end to end.
    ///
    /// On failure the returned [`CrawlFailure`] carries both the error and a
    /// best-effort result with everything captured up to the failure point.
    pub async fn run(
        &self,
        url: &str,
        cfg: &RunConfig,
        cancel: &CancellationToken,
    ) -> std::result::Result<CrawlResult, CrawlFailure> {
        let fetched = match self.fetch_html(url, cfg, cancel).await {
            Ok(fetched) => fetched,
            Err(error) => {
                return Err(CrawlFailure {
                    result: CrawlResult {
                        url: url.to_string(),
                        error_message: error.to_string(),
                        ..CrawlResult::default()
                    },
                    error,
                });
            }
        };

        if cfg.verbose {
            debug!(url, status = fetched.status_code, bytes = fetched.html.len(), "page fetched");
        }

        let base_url = fetched
            .redirected_url
            .clone()
            .unwrap_or_else(|| url.to_string());

        match extract::process(&fetched.html, &base_url, cfg) {
            Ok(out) => Ok(CrawlResult {
                url: url.to_string(),
                html: fetched.html,
                cleaned_html: out.cleaned_html,
                success: true,
                markdown: out.markdown,
                metadata: out.metadata,
                response_headers: fetched.response_headers,
                status_code: fetched.status_code,
                redirected_url: fetched.redirected_url,
                ..CrawlResult::default()
            }),
            Err(error) => Err(CrawlFailure {
                result: CrawlResult {
                    url: url.to_string(),
                    html: fetched.html,
                    error_message: error.to_string(),
                    response_headers: fetched.response_headers,
                    status_code: fetched.status_code,
                    redirected_url: fetched.redirected_url,
                    ..CrawlResult::default()
                },
                error,
            }),
        }
    }
}
