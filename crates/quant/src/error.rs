//! Error types for the analytics core.
//!
//! Every operation fails fast with one of three kinds: invalid mathematics
//! ([`DomainError`]), a malformed request ([`InputError`]) or missing data
//! ([`QuantError::DataGap`]). No computation substitutes NaN, infinity or a
//! default value for a failed step.

use chrono::NaiveDate;
use thiserror::Error;
use types::{Ticker, TypesError};

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, QuantError>;

/// Top-level analytics error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// The requested ticker/date range has no data.
    #[error("no data for {ticker}: {detail}")]
    DataGap { ticker: Ticker, detail: String },
}

impl QuantError {
    pub(crate) fn data_gap(ticker: impl Into<Ticker>, detail: impl Into<String>) -> Self {
        Self::DataGap {
            ticker: ticker.into(),
            detail: detail.into(),
        }
    }
}

impl From<TypesError> for QuantError {
    fn from(e: TypesError) -> Self {
        QuantError::Input(InputError::Model(e))
    }
}

/// Invalid mathematical input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A logarithm of a non-positive price was requested.
    #[error("{ticker} on {date}: price {value} is not positive")]
    NonPositivePrice {
        ticker: Ticker,
        date: NaiveDate,
        value: f64,
    },

    /// Standardization of a series with zero variance.
    #[error("{0}: series has zero variance")]
    ZeroVariance(String),

    /// A covariance matrix could not be inverted.
    #[error("{0} is singular")]
    SingularCovariance(&'static str),

    /// Every selected neighbor sits at distance zero, so tightness is unbounded.
    #[error("{0}: all neighbor distances are zero")]
    DegenerateNeighborhood(Ticker),

    /// A computation produced NaN or infinity.
    #[error("{0} is not finite")]
    NonFinite(String),
}

/// Malformed request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{0}: series is empty")]
    EmptySeries(String),

    #[error("universe is empty")]
    EmptyUniverse,

    #[error("span must be at least 1, got {0}")]
    InvalidSpan(u32),

    /// Two series that must share a date axis do not.
    #[error("{left} and {right} are not aligned on the same dates")]
    MisalignedSeries { left: Ticker, right: Ticker },

    #[error("unknown ticker: {0}")]
    UnknownTicker(Ticker),

    #[error("k = {k} is outside 1..={available}")]
    InvalidNeighborCount { k: usize, available: usize },

    /// Too few rows for a covariance estimate.
    #[error("need more than {required} observations, got {actual}")]
    InsufficientObservations { required: usize, actual: usize },

    #[error("distance matrix: {0}")]
    MalformedMatrix(String),

    #[error(transparent)]
    Model(TypesError),
}
