pub mod cancel;
pub mod context;
pub mod error;

pub use cancel::CancellationToken;
pub use context::Crawler;
pub use error::{ProwlError, Result};
