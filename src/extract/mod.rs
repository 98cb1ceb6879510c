//! Multi-stage content extraction.
//!
//! A pure transformation over the fetched page: raw HTML goes through
//! readability cleaning and Markdown conversion, each stage independently
//! toggleable via [`RunConfig`]. No state is kept between calls.

mod clean;
mod markdown;

pub use clean::clean;
pub use markdown::to_markdown;

use crate::app::Result;
use crate::config::RunConfig;
use crate::domain::Metadata;

/// Output of the extraction pipeline.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutput {
    /// Cleaned HTML; falls back to the raw input when cleaning is disabled
    /// or produced nothing
    pub cleaned_html: String,
    /// Markdown text; empty when the stage is disabled
    pub markdown: String,
    /// Document metadata; empty when cleaning is disabled
    pub metadata: Metadata,
}

/// Runs the enabled extraction stages over `raw_html`.
///
/// A failing stage propagates immediately; Markdown conversion never runs
/// after a cleaning failure. Markdown always converts the best available
/// HTML: cleaned when present, raw otherwise.
pub fn process(raw_html: &str, base_url: &str, cfg: &RunConfig) -> Result<ExtractionOutput> {
    let mut out = ExtractionOutput {
        cleaned_html: raw_html.to_string(),
        ..ExtractionOutput::default()
    };

    if cfg.clean_html {
        let (cleaned, metadata) = clean(raw_html, base_url, cfg.only_text)?;
        if !cleaned.is_empty() {
            out.cleaned_html = cleaned;
        }
        out.metadata = metadata;
    }

    if cfg.markdown {
        let input = if out.cleaned_html.is_empty() {
            raw_html
        } else {
            &out.cleaned_html
        };
        out.markdown = to_markdown(input)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head><title>Pipeline Test</title></head>
        <body>
            <article>
                <h1>Main Heading</h1>
                <p>This is a substantial paragraph with plenty of content so the
                readability scoring has something to work with when it looks for
                the main article of the document.</p>
                <p>Another paragraph with more text, because a single short line
                is not enough for the extractor to pick a top candidate.</p>
            </article>
        </body>
        </html>
    "#;

    fn cfg(clean_html: bool, markdown: bool) -> RunConfig {
        RunConfig {
            clean_html,
            markdown,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_cleaning_disabled_passes_raw_html_through() {
        let out = process(ARTICLE_HTML, "https://example.com", &cfg(false, false)).unwrap();
        assert_eq!(out.cleaned_html, ARTICLE_HTML);
        assert!(out.metadata.is_empty());
        assert!(out.markdown.is_empty());
    }

    #[test]
    fn test_both_stages_enabled() {
        let out = process(ARTICLE_HTML, "https://example.com", &cfg(true, true)).unwrap();
        assert!(!out.cleaned_html.is_empty());
        assert!(!out.markdown.is_empty());
        assert_eq!(out.metadata.get("title").map(String::as_str), Some("Pipeline Test"));
    }

    #[test]
    fn test_markdown_converts_raw_html_when_cleaning_disabled() {
        let out = process("<p>Hello world</p>", "https://example.com", &cfg(false, true)).unwrap();
        assert!(out.markdown.contains("Hello world"));
        assert!(out.metadata.is_empty());
    }

    #[test]
    fn test_cleaning_failure_skips_markdown() {
        // A malformed base URL fails the cleaning stage before Markdown runs.
        let err = process(ARTICLE_HTML, "::not a url::", &cfg(true, true)).unwrap_err();
        assert!(matches!(err, crate::app::ProwlError::Extraction(_)));
    }

    #[test]
    fn test_empty_raw_html_yields_empty_markdown() {
        let out = process("", "https://example.com", &cfg(false, true)).unwrap();
        assert!(out.cleaned_html.is_empty());
        assert!(out.markdown.trim().is_empty());
    }
}
