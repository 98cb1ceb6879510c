//! # Prowl4ai
//!
//! A headless-browser web crawler: fetches fully rendered pages through
//! Chromium and distills them into readability-cleaned HTML and Markdown.
//!
//! ## Architecture
//!
//! ```text
//! Browser → Service → Extract → CrawlResult
//! ```
//!
//! - [`browser`]: Chromium driver speaking the Chrome DevTools Protocol
//! - [`service`]: Crawl orchestration and browser lifecycle
//! - [`extract`]: Readability cleaning and Markdown conversion
//!
//! ## Quick Start
//!
//! ```bash
//! # Crawl a page, print the result as JSON
//! prowl4ai crawl https://example.com
//!
//! # Just the Markdown, with a shorter timeout
//! prowl4ai crawl --timeout 10000 --output markdown https://example.com
//! ```
//!
//! ## Library Use
//!
//! ```no_run
//! use prowl4ai::Crawler;
//!
//! # async fn run() {
//! let crawler = Crawler::new();
//! match crawler.crawl("https://example.com").await {
//!     Ok(result) => println!("{}", result.markdown),
//!     Err(failure) => eprintln!("{}", failure.error),
//! }
//! let _ = crawler.close().await;
//! # }
//! ```

/// Crawler facade, cancellation and error types.
///
/// [`Crawler`](app::Crawler) is the embedder-facing entry point wiring the
/// browser driver and crawl service together.
pub mod app;

/// Browser engines.
///
/// - [`BrowserDriver`](browser::BrowserDriver): async trait over an engine
/// - [`CdpBrowser`](browser::CdpBrowser): chromiumoxide-based implementation
pub mod browser;

/// Command-line interface using clap.
///
/// Defines the CLI structure and subcommands:
/// - `crawl [--timeout ms] [--headless bool] [--output json|markdown] <url>`
pub mod cli;

/// Browser and per-crawl configuration with serde support.
///
/// - [`BrowserConfig`](config::BrowserConfig): engine launch options
/// - [`RunConfig`](config::RunConfig): per-crawl navigation and extraction
pub mod config;

/// Core domain models.
///
/// - [`CrawlResult`](domain::CrawlResult): uniform crawl outcome with a
///   stable JSON shape
/// - [`CrawlFailure`](domain::CrawlFailure): error paired with the partial
///   result captured before the failure
pub mod domain;

/// Content extraction pipeline.
///
/// Readability cleaning via the readability crate, metadata scraping, and
/// HTML to Markdown conversion via htmd.
pub mod extract;

/// Crawl orchestration.
///
/// [`CrawlService`](service::CrawlService) owns the driver lifecycle and
/// sequences validate, fetch, extract, assemble.
pub mod service;

pub use app::{CancellationToken, Crawler, ProwlError, Result};
pub use config::{BrowserConfig, BrowserKind, ProxyConfig, RunConfig};
pub use domain::{CrawlFailure, CrawlResult};
