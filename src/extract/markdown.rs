use crate::app::{ProwlError, Result};

/// Converts HTML to Markdown.
pub fn to_markdown(html: &str) -> Result<String> {
    htmd::convert(html)
        .map_err(|e| ProwlError::Extraction(format!("markdown conversion failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_markdown_headings_and_paragraphs() {
        let markdown = to_markdown("<h1>Title</h1><p>Hello <strong>world</strong>.</p>").unwrap();
        assert!(markdown.contains("# Title"));
        assert!(markdown.contains("**world**"));
    }

    #[test]
    fn test_to_markdown_empty_input() {
        let markdown = to_markdown("").unwrap();
        assert!(markdown.trim().is_empty());
    }
}
