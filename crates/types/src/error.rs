//! Validation errors raised while constructing data-model values.

use chrono::NaiveDate;
use thiserror::Error;

use crate::ids::Ticker;

/// Result type for data-model construction.
pub type Result<T> = std::result::Result<T, TypesError>;

/// A value violated one of the data-model invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    /// Dates within one ticker must be strictly increasing and unique.
    #[error("{ticker}: date {date} is not after the previous row")]
    UnorderedDates { ticker: Ticker, date: NaiveDate },

    /// A ticker appeared twice in a collection keyed by ticker.
    #[error("duplicate ticker: {0}")]
    DuplicateTicker(Ticker),

    /// A requested ticker is not part of the collection.
    #[error("unknown ticker: {0}")]
    UnknownTicker(Ticker),

    /// An insider type label could not be parsed.
    #[error("unknown insider type: {0:?}")]
    UnknownInsiderType(String),

    /// A record field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}
