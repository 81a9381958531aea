//! Identifier types for tickers, filings and filers.

use derive_more::{Add, Display, From, Into, Sum};
use serde::{Deserialize, Serialize};

/// Stock ticker symbol (e.g., "AAPL", "GOOGL").
pub type Ticker = String;

/// SEC accession number, e.g. `0000320193-24-000081`.
///
/// This is the deduplication key for insider-buy records.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct AccessionId(pub String);

impl AccessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accession number with the dashes removed, as used in archive paths.
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }
}

impl From<&str> for AccessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// SEC Central Index Key, stored zero padded to ten digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct Cik(String);

impl Cik {
    /// Width of the padded representation.
    pub const WIDTH: usize = 10;

    pub fn from_number(n: u64) -> Self {
        Self(format!("{:0width$}", n, width = Self::WIDTH))
    }

    /// Parse a CIK given either padded or unpadded. Returns `None` for non-digits.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        s.parse::<u64>().ok().map(Self::from_number)
    }

    /// Padded ten-digit form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form without leading zeros, as used in archive paths.
    pub fn unpadded(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }
    }
}

/// Number of shares in a transaction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Display,
    Add,
    Sum,
    From,
    Into,
)]
#[serde(transparent)]
pub struct Shares(pub u64);

impl Shares {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}
