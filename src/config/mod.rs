use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ProwlError;

pub const DEFAULT_PAGE_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_WAIT_UNTIL: &str = "domcontentloaded";
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1080;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 600;
pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/116.0.0.0 Safari/537.36";

/// Browser engine family driven by the crawler.
///
/// Parsing an unknown name fails; the set of recognized engines is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl FromStr for BrowserKind {
    type Err = ProwlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "chromium" | "chrome" => Ok(Self::Chromium),
            "firefox" => Ok(Self::Firefox),
            "webkit" => Ok(Self::Webkit),
            other => Err(ProwlError::EngineUnsupported(other.to_string())),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::Webkit => "webkit",
        };
        f.write_str(name)
    }
}

/// Proxy settings passed to the browser engine at launch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy server, e.g. "http://myproxy:3128" or "socks5://myproxy:8080"
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Configuration for how the browser engine is launched.
///
/// Immutable once a driver instance has started; changing it requires a new
/// instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Engine family to launch (default: chromium)
    pub kind: BrowserKind,

    /// Whether to run the browser without a visible UI surface (default: true)
    pub headless: bool,

    /// Explicit browser executable; when unset the engine is discovered on PATH
    pub executable: Option<PathBuf>,

    /// Proxy settings applied to all pages
    pub proxy: Option<ProxyConfig>,

    /// Viewport width in pixels (default: 1080)
    pub viewport_width: u32,

    /// Viewport height in pixels (default: 600)
    pub viewport_height: u32,

    /// User agent string applied to every page
    pub user_agent: String,

    /// Extra command-line arguments appended to the engine launch
    pub extra_args: Vec<String>,

    /// Remote debugging port exposed by a Chromium engine when set
    pub debugging_port: Option<u16>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chromium,
            headless: true,
            executable: None,
            proxy: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_args: Vec::new(),
            debugging_port: None,
        }
    }
}

/// Per-crawl execution parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Page load timeout in milliseconds; 0 means unset and normalizes to
    /// the default (60000)
    pub page_timeout_ms: u64,

    /// Navigation readiness condition; empty normalizes to "domcontentloaded"
    pub wait_until: String,

    /// Optional CSS selector to wait for after navigation completes
    pub wait_for: Option<String>,

    /// Timeout budget for the selector wait; falls back to the page timeout
    pub wait_for_timeout_ms: Option<u64>,

    /// Run the readability cleaning stage (default: true)
    pub clean_html: bool,

    /// Run the Markdown conversion stage (default: true)
    pub markdown: bool,

    /// Emit the article's plain text instead of cleaned HTML
    pub only_text: bool,

    /// Optional CSS selector scoping for extraction
    pub css_selector: Option<String>,

    /// Emit per-crawl debug logging (default: true)
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            page_timeout_ms: DEFAULT_PAGE_TIMEOUT_MS,
            wait_until: DEFAULT_WAIT_UNTIL.to_string(),
            wait_for: None,
            wait_for_timeout_ms: None,
            clean_html: true,
            markdown: true,
            only_text: false,
            css_selector: None,
            verbose: true,
        }
    }
}

impl RunConfig {
    /// Returns a copy with the timeout and wait-until defaults applied.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.page_timeout_ms == 0 {
            cfg.page_timeout_ms = DEFAULT_PAGE_TIMEOUT_MS;
        }
        if cfg.wait_until.is_empty() {
            cfg.wait_until = DEFAULT_WAIT_UNTIL.to_string();
        }
        cfg
    }

    /// Effective page load timeout as a Duration.
    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        let ms = if self.page_timeout_ms == 0 {
            DEFAULT_PAGE_TIMEOUT_MS
        } else {
            self.page_timeout_ms
        };
        Duration::from_millis(ms)
    }

    /// Effective selector-wait budget; the page timeout unless a dedicated
    /// budget is configured.
    #[must_use]
    pub fn wait_for_timeout(&self) -> Duration {
        match self.wait_for_timeout_ms {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => self.page_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_config_values() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.page_timeout_ms, 60_000);
        assert_eq!(cfg.wait_until, "domcontentloaded");
        assert!(cfg.wait_for.is_none());
        assert!(cfg.clean_html);
        assert!(cfg.markdown);
        assert!(!cfg.only_text);
        assert!(cfg.verbose);
    }

    #[test]
    fn test_zero_timeout_normalizes_to_default() {
        let cfg = RunConfig {
            page_timeout_ms: 0,
            ..RunConfig::default()
        };
        assert_eq!(cfg.normalized().page_timeout_ms, DEFAULT_PAGE_TIMEOUT_MS);
        assert_eq!(cfg.page_timeout(), Duration::from_millis(60_000));
    }

    #[test]
    fn test_empty_wait_until_normalizes_to_default() {
        let cfg = RunConfig {
            wait_until: String::new(),
            ..RunConfig::default()
        };
        assert_eq!(cfg.normalized().wait_until, DEFAULT_WAIT_UNTIL);
    }

    #[test]
    fn test_explicit_values_survive_normalization() {
        let cfg = RunConfig {
            page_timeout_ms: 5_000,
            wait_until: "load".to_string(),
            ..RunConfig::default()
        };
        let normalized = cfg.normalized();
        assert_eq!(normalized.page_timeout_ms, 5_000);
        assert_eq!(normalized.wait_until, "load");
    }

    #[test]
    fn test_wait_for_timeout_falls_back_to_page_timeout() {
        let cfg = RunConfig {
            page_timeout_ms: 10_000,
            ..RunConfig::default()
        };
        assert_eq!(cfg.wait_for_timeout(), Duration::from_millis(10_000));

        let cfg = RunConfig {
            page_timeout_ms: 10_000,
            wait_for_timeout_ms: Some(2_000),
            ..RunConfig::default()
        };
        assert_eq!(cfg.wait_for_timeout(), Duration::from_millis(2_000));
    }

    #[test]
    fn test_browser_kind_parsing() {
        assert_eq!("chromium".parse::<BrowserKind>().unwrap(), BrowserKind::Chromium);
        assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chromium);
        assert_eq!("firefox".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
        assert_eq!("webkit".parse::<BrowserKind>().unwrap(), BrowserKind::Webkit);
        assert_eq!("".parse::<BrowserKind>().unwrap(), BrowserKind::Chromium);
        assert!("netscape".parse::<BrowserKind>().is_err());
    }

    #[test]
    fn test_default_browser_config_values() {
        let cfg = BrowserConfig::default();
        assert_eq!(cfg.kind, BrowserKind::Chromium);
        assert!(cfg.headless);
        assert_eq!(cfg.viewport_width, 1080);
        assert_eq!(cfg.viewport_height, 600);
        assert!(cfg.extra_args.is_empty());
        assert!(cfg.debugging_port.is_none());
    }
}
