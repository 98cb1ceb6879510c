use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProwlError {
    #[error("invalid url")]
    InvalidUrl,

    #[error("browser not started")]
    NotStarted,

    #[error("service not ready")]
    NotReady,

    #[error("unsupported browser engine: {0}")]
    EngineUnsupported(String),

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("operation timed out after {0}ms")]
    Timeout(u64),

    #[error("crawl cancelled")]
    Cancelled,

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("browser shutdown failed: {0}")]
    Shutdown(String),
}

pub type Result<T> = std::result::Result<T, ProwlError>;
