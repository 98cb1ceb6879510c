use std::process::ExitCode;

use crate::app::Crawler;
use crate::cli::OutputFormat;
use crate::config::{BrowserConfig, RunConfig};
use crate::domain::CrawlResult;

/// Runs one crawl and prints the result.
///
/// Exit code 0 on success, 1 on a failed crawl. A failed crawl still prints
/// the partial result as JSON so callers can inspect what was captured.
pub async fn crawl(url: &str, timeout_ms: u64, headless: bool, output: OutputFormat) -> ExitCode {
    let browser = BrowserConfig {
        headless,
        ..BrowserConfig::default()
    };
    let run = RunConfig {
        page_timeout_ms: timeout_ms,
        ..RunConfig::default()
    };

    let crawler = Crawler::with_config(browser, run);
    let outcome = crawler.crawl(url).await;

    if let Err(e) = crawler.close().await {
        eprintln!("close error: {}", e);
    }

    match outcome {
        Ok(result) => match output {
            OutputFormat::Json => {
                if print_json(&result) {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(1)
                }
            }
            OutputFormat::Markdown => {
                if !result.markdown.is_empty() {
                    println!("{}", result.markdown);
                } else if !result.cleaned_html.is_empty() {
                    println!("{}", result.cleaned_html);
                } else {
                    println!("{}", result.html);
                }
                ExitCode::SUCCESS
            }
        },
        Err(failure) => {
            eprintln!("crawl failed: {}", failure.error);
            print_json(&failure.result);
            ExitCode::from(1)
        }
    }
}

fn print_json(result: &CrawlResult) -> bool {
    match serde_json::to_string_pretty(result) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("failed to encode result: {}", e);
            false
        }
    }
}
