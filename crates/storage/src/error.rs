//! Storage errors.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;
use types::{Ticker, TypesError};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path}, row {row}: {reason}")]
    Parse {
        path: PathBuf,
        row: u64,
        reason: String,
    },

    #[error(transparent)]
    Model(#[from] TypesError),

    /// No rows for the ticker in the requested range.
    #[error("no prices for {ticker} between {from} and {to}")]
    DataGap {
        ticker: Ticker,
        from: NaiveDate,
        to: NaiveDate,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
