use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::ProwlError;

/// Document metadata produced by the readability stage
/// (title, byline, excerpt, lang).
pub type Metadata = BTreeMap<String, String>;

/// Response headers, lowercased names merged case-insensitively into a
/// multi-valued map.
pub type Headers = BTreeMap<String, Vec<String>>;

/// Structured output of a crawl run.
///
/// Constructed fresh per invocation and always produced, even on failure, so
/// whatever was captured before the failure point stays visible to the
/// caller. The JSON field names are a stable contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub html: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub cleaned_html: String,

    pub success: bool,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub markdown: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub metadata: Metadata,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub error_message: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub response_headers: Headers,

    #[serde(skip_serializing_if = "status_is_unset", default)]
    pub status_code: u16,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub redirected_url: Option<String>,
}

fn status_is_unset(status: &u16) -> bool {
    *status == 0
}

/// A failed crawl: the error plus the best-effort result captured before the
/// failure point.
///
/// Keeping the two together preserves the diagnostic payload that a bare
/// error would lose.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct CrawlFailure {
    #[source]
    pub error: ProwlError,
    pub result: CrawlResult,
}
