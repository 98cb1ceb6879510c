//! Browser capability: page fetching through a real engine.
//!
//! The [`BrowserDriver`] trait is the seam between the crawl service and the
//! engine. Production code uses [`CdpBrowser`], which drives Chromium over
//! the Chrome DevTools Protocol; tests substitute a canned driver.

mod cdp;

pub use cdp::CdpBrowser;

use async_trait::async_trait;

use crate::app::{CancellationToken, Result};
use crate::config::RunConfig;
use crate::domain::Headers;

/// Result of fetching one page, consumed immediately by the crawl service.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    /// Fully rendered HTML of the page
    pub html: String,
    /// HTTP status of the main document response; 0 when unknown
    pub status_code: u16,
    /// Final URL after redirects, when it differs from about:blank
    pub redirected_url: Option<String>,
    /// Main document response headers
    pub response_headers: Headers,
}

/// Capability interface over a browser engine.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Launches the engine. Idempotent; a second call on a started driver is
    /// a no-op.
    async fn start(&self) -> Result<()>;

    /// Opens an isolated page, navigates to `url` honoring the configured
    /// readiness condition and timeouts, and returns the rendered HTML with
    /// navigation metadata. Requires a prior successful `start`.
    async fn fetch_html(
        &self,
        url: &str,
        cfg: &RunConfig,
        cancel: &CancellationToken,
    ) -> Result<FetchResult>;

    /// Releases the engine process. Idempotent; closing a driver that never
    /// started is a no-op.
    async fn close(&self) -> Result<()>;
}
