//! Log-return series derived from price panels.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TypesError};
use crate::ids::Ticker;

/// Log-returns of one session relative to the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogReturns {
    /// ln(high / prev_close).
    pub high: f64,
    /// ln(low / prev_close).
    pub low: f64,
    /// ln(close / prev_close).
    pub close: f64,
}

impl LogReturns {
    pub const ZERO: LogReturns = LogReturns {
        high: 0.0,
        low: 0.0,
        close: 0.0,
    };

    #[inline]
    pub fn get(&self, column: ReturnColumn) -> f64 {
        match column {
            ReturnColumn::High => self.high,
            ReturnColumn::Low => self.low,
            ReturnColumn::Close => self.close,
        }
    }
}

/// One column of a [`ReturnSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnColumn {
    High,
    Low,
    Close,
}

impl ReturnColumn {
    /// Feature column order: high, low, close.
    pub const ALL: [ReturnColumn; 3] = [ReturnColumn::High, ReturnColumn::Low, ReturnColumn::Close];

    pub fn label(self) -> &'static str {
        match self {
            ReturnColumn::High => "lrh",
            ReturnColumn::Low => "lrl",
            ReturnColumn::Close => "lrc",
        }
    }
}

/// Per-ticker daily log-returns, sharing the date index of its price panel.
///
/// The first row is all zeros by convention since it has no prior close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    ticker: Ticker,
    dates: Vec<NaiveDate>,
    rows: Vec<LogReturns>,
}

impl ReturnSeries {
    /// Build a series. `dates` and `rows` must have equal length.
    pub fn new(ticker: impl Into<Ticker>, dates: Vec<NaiveDate>, rows: Vec<LogReturns>) -> Result<Self> {
        if dates.len() != rows.len() {
            return Err(TypesError::InvalidField {
                field: "rows",
                reason: format!("{} dates but {} rows", dates.len(), rows.len()),
            });
        }
        Ok(Self {
            ticker: ticker.into(),
            dates,
            rows,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[LogReturns] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, column: ReturnColumn) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(column)).collect()
    }

    /// The close-return column (`lrc`).
    pub fn closes(&self) -> Vec<f64> {
        self.column(ReturnColumn::Close)
    }

    /// Last `n` dates (all of them if `n >= len`).
    pub fn tail_dates(&self, n: usize) -> &[NaiveDate] {
        &self.dates[self.dates.len().saturating_sub(n)..]
    }
}

/// Return series for a universe, in a fixed ticker order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnPanel {
    series: Vec<ReturnSeries>,
}

impl ReturnPanel {
    /// Build a panel, rejecting duplicate tickers.
    pub fn new(series: Vec<ReturnSeries>) -> Result<Self> {
        for (i, s) in series.iter().enumerate() {
            if series[..i].iter().any(|o| o.ticker == s.ticker) {
                return Err(TypesError::DuplicateTicker(s.ticker.clone()));
            }
        }
        Ok(Self { series })
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.ticker()).collect()
    }

    pub fn get(&self, ticker: &str) -> Option<&ReturnSeries> {
        self.series.iter().find(|s| s.ticker == ticker)
    }

    pub fn series(&self) -> &[ReturnSeries] {
        &self.series
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReturnSeries> {
        self.series.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
