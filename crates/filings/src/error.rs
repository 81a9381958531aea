//! Filing document errors.

use thiserror::Error;
use types::Ticker;

/// Result type for filing operations.
pub type Result<T> = std::result::Result<T, FilingError>;

#[derive(Debug, Error)]
pub enum FilingError {
    #[error("no CIK registered for ticker {0}")]
    UnknownTicker(Ticker),

    #[error("ticker {ticker} matches {count} CIKs")]
    AmbiguousTicker { ticker: Ticker, count: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but violates its expected shape.
    #[error("malformed document: {0}")]
    Malformed(String),
}
