//! Ticker → CIK lookup built from the SEC `company_tickers.json` document.
//!
//! ```json
//! {"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}
//! ```
//!
//! The directory is an ordinary value: load it once and pass it to whatever
//! needs lookups.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::debug;
use types::{Cik, Ticker};

use crate::error::{FilingError, Result};

#[derive(Debug, Deserialize)]
struct CompanyEntry {
    cik_str: u64,
    ticker: String,
    #[serde(default)]
    title: String,
}

/// A company known to EDGAR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub cik: Cik,
    pub ticker: Ticker,
    pub title: String,
}

/// Ticker to CIK directory.
#[derive(Debug, Clone, Default)]
pub struct CikDirectory {
    by_ticker: HashMap<Ticker, Vec<Company>>,
}

impl CikDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `company_tickers.json` document.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, CompanyEntry> = serde_json::from_str(json)?;
        let mut directory = Self::new();
        for entry in entries.into_values() {
            directory.insert(Company {
                cik: Cik::from_number(entry.cik_str),
                ticker: entry.ticker,
                title: entry.title,
            });
        }
        debug!(tickers = directory.len(), "loaded CIK directory");
        Ok(directory)
    }

    pub fn insert(&mut self, company: Company) {
        self.by_ticker
            .entry(company.ticker.clone())
            .or_default()
            .push(company);
    }

    /// Number of distinct tickers.
    pub fn len(&self) -> usize {
        self.by_ticker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ticker.is_empty()
    }

    /// Ten-digit CIK for an exact ticker match.
    ///
    /// # Errors
    /// [`FilingError::UnknownTicker`] for no match, [`FilingError::AmbiguousTicker`]
    /// when several companies list the same ticker.
    pub fn resolve(&self, ticker: &str) -> Result<Cik> {
        match self.by_ticker.get(ticker).map(Vec::as_slice) {
            None | Some([]) => Err(FilingError::UnknownTicker(ticker.to_string())),
            Some([company]) => Ok(company.cik.clone()),
            Some(many) => Err(FilingError::AmbiguousTicker {
                ticker: ticker.to_string(),
                count: many.len(),
            }),
        }
    }

    pub fn company(&self, ticker: &str) -> Option<&Company> {
        match self.by_ticker.get(ticker)?.as_slice() {
            [company] => Some(company),
            _ => None,
        }
    }
}
