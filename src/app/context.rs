//! Library facade.
//!
//! [`Crawler`] wires the browser driver and crawl service together behind a
//! small embedder-facing API. The CLI goes through this same type.

use std::sync::Arc;

use crate::app::cancel::CancellationToken;
use crate::app::Result;
use crate::browser::{BrowserDriver, CdpBrowser};
use crate::config::{BrowserConfig, RunConfig};
use crate::domain::{CrawlFailure, CrawlResult};
use crate::service::CrawlService;

pub struct Crawler {
    service: CrawlService,
    default_run: RunConfig,
}

impl Crawler {
    /// Crawler with default browser and run configuration.
    pub fn new() -> Self {
        Self::with_config(BrowserConfig::default(), RunConfig::default())
    }

    /// Crawler with explicit configuration, driving Chromium over CDP.
    pub fn with_config(browser: BrowserConfig, run: RunConfig) -> Self {
        Self::with_driver(Arc::new(CdpBrowser::new(browser)), run)
    }

    /// Crawler over a caller-supplied driver.
    pub fn with_driver(driver: Arc<dyn BrowserDriver>, run: RunConfig) -> Self {
        Self {
            service: CrawlService::new(driver),
            default_run: run.normalized(),
        }
    }

    /// Replaces the stored run configuration used by [`Crawler::crawl`].
    pub fn set_default_run_config(&mut self, run: RunConfig) {
        self.default_run = run.normalized();
    }

    /// Crawls `url` with the stored run configuration.
    pub async fn crawl(&self, url: &str) -> std::result::Result<CrawlResult, CrawlFailure> {
        self.service
            .run(url, &self.default_run, &CancellationToken::new())
            .await
    }

    /// Crawls `url` with a per-call configuration override.
    pub async fn crawl_with(
        &self,
        url: &str,
        run: &RunConfig,
    ) -> std::result::Result<CrawlResult, CrawlFailure> {
        self.service
            .run(url, run, &CancellationToken::new())
            .await
    }

    /// Crawls `url` honoring an external cancellation token.
    pub async fn crawl_cancellable(
        &self,
        url: &str,
        run: &RunConfig,
        cancel: &CancellationToken,
    ) -> std::result::Result<CrawlResult, CrawlFailure> {
        self.service.run(url, run, cancel).await
    }

    /// Releases the browser. The crawler is unusable afterwards.
    pub async fn close(&self) -> Result<()> {
        self.service.close().await
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}
