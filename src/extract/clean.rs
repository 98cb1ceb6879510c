use scraper::{Html, Selector};
use url::Url;

use crate::app::{ProwlError, Result};
use crate::domain::Metadata;

/// Readability cleaning: extracts the main article content from a full HTML
/// document and collects document metadata (title, byline, excerpt, lang).
///
/// With `only_text` set the article's plain text is returned instead of its
/// cleaned HTML.
pub fn clean(raw_html: &str, base_url: &str, only_text: bool) -> Result<(String, Metadata)> {
    let parsed = Url::parse(base_url)
        .map_err(|e| ProwlError::Extraction(format!("invalid base url {base_url:?}: {e}")))?;

    let product = readability::extractor::extract(&mut raw_html.as_bytes(), &parsed)
        .map_err(|e| ProwlError::Extraction(format!("readability failed: {e:?}")))?;

    let mut metadata = Metadata::new();
    if !product.title.is_empty() {
        metadata.insert("title".to_string(), product.title.clone());
    }
    for (key, value) in document_metadata(raw_html) {
        metadata.insert(key, value);
    }

    let cleaned = if only_text {
        product.text
    } else {
        product.content
    };
    Ok((cleaned, metadata))
}

/// Byline, excerpt and language live in the document head, which readability
/// discards; scrape them from the raw document.
fn document_metadata(raw_html: &str) -> Vec<(String, String)> {
    let doc = Html::parse_document(raw_html);
    let mut pairs = Vec::new();

    if let Some(byline) = meta_content(&doc, "meta[name=\"author\"]") {
        pairs.push(("byline".to_string(), byline));
    }
    if let Some(excerpt) = meta_content(&doc, "meta[name=\"description\"]")
        .or_else(|| meta_content(&doc, "meta[property=\"og:description\"]"))
    {
        pairs.push(("excerpt".to_string(), excerpt));
    }
    if let Some(lang) = root_attr(&doc, "html", "lang") {
        pairs.push(("lang".to_string(), lang));
    }

    pairs
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let content = doc.select(&selector).next()?.value().attr("content")?.trim();
    (!content.is_empty()).then(|| content.to_string())
}

fn root_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let value = doc.select(&selector).next()?.value().attr(attr)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}
