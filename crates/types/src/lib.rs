//! Core types for the insider-lateral workspace.
//!
//! This crate provides the shared data model used across the analytics,
//! storage and filings crates: daily price panels, log-return series,
//! insider-buy records and identifier newtypes.

mod error;
mod ids;
mod insider;
mod market_data;
mod metric;
mod returns;

pub use error::{Result, TypesError};
pub use ids::{AccessionId, Cik, Shares, Ticker};
pub use insider::{InsiderBuyRecord, InsiderType, InsiderTypes};
pub use market_data::{MultiPanel, OhlcvBar, PricePanel};
pub use metric::MetricType;
pub use returns::{LogReturns, ReturnColumn, ReturnPanel, ReturnSeries};

/// Re-exported so downstream crates name dates with the same type.
pub use chrono::NaiveDate;
