//! Insider purchase records extracted from Form 4 filings.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TypesError};
use crate::ids::{AccessionId, Shares, Ticker};

// =============================================================================
// Insider Type
// =============================================================================

/// Relationship of the reporting owner to the issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InsiderType {
    Director,
    Officer,
    TenPercentOwner,
    Other,
}

impl InsiderType {
    pub const ALL: [InsiderType; 4] = [
        InsiderType::Director,
        InsiderType::Officer,
        InsiderType::TenPercentOwner,
        InsiderType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InsiderType::Director => "Director",
            InsiderType::Officer => "Officer",
            InsiderType::TenPercentOwner => "TenPercentOwner",
            InsiderType::Other => "Other",
        }
    }
}

impl fmt::Display for InsiderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsiderType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        InsiderType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| TypesError::UnknownInsiderType(s.to_string()))
    }
}

/// Set of insider relationships held by one reporting owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsiderTypes(BTreeSet<InsiderType>);

impl InsiderTypes {
    /// Separator used when the set is flattened into a single text field.
    pub const SEPARATOR: &'static str = ", ";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = InsiderType> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `"Director, Officer"` style text.
    pub fn to_joined(&self) -> String {
        self.iter()
            .map(InsiderType::as_str)
            .collect::<Vec<_>>()
            .join(Self::SEPARATOR)
    }

    /// Inverse of [`to_joined`](Self::to_joined). Empty text gives an empty set.
    pub fn parse_joined(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(InsiderType::from_str)
            .collect()
    }
}

impl FromIterator<InsiderType> for InsiderTypes {
    fn from_iter<I: IntoIterator<Item = InsiderType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Insider Buy Record
// =============================================================================

/// An open-market purchase of common stock reported by an insider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderBuyRecord {
    /// Accession number of the filing; unique per record store.
    pub accession: AccessionId,
    /// Issuer trading symbol.
    pub ticker: Ticker,
    /// Transaction date.
    pub trade_date: NaiveDate,
    /// Date the filing was accepted.
    pub filing_date: NaiveDate,
    /// Relationships of the reporting owner.
    pub insider_types: InsiderTypes,
    /// Shares purchased.
    pub shares: Shares,
    /// Price per share; zero when the filing omits it.
    pub price_per_share: f64,
}

impl InsiderBuyRecord {
    /// Build a validated record.
    pub fn new(
        accession: impl Into<AccessionId>,
        ticker: impl Into<Ticker>,
        trade_date: NaiveDate,
        filing_date: NaiveDate,
        insider_types: InsiderTypes,
        shares: Shares,
        price_per_share: f64,
    ) -> Result<Self> {
        let record = Self {
            accession: accession.into(),
            ticker: ticker.into().trim().to_string(),
            trade_date,
            filing_date,
            insider_types,
            shares,
            price_per_share,
        };
        record.validate()?;
        Ok(record)
    }

    /// Check field invariants.
    pub fn validate(&self) -> Result<()> {
        if self.accession.as_str().trim().is_empty() {
            return Err(TypesError::InvalidField {
                field: "accession",
                reason: "empty".into(),
            });
        }
        if self.ticker.is_empty() {
            return Err(TypesError::InvalidField {
                field: "ticker",
                reason: "empty".into(),
            });
        }
        if !self.price_per_share.is_finite() || self.price_per_share < 0.0 {
            return Err(TypesError::InvalidField {
                field: "price_per_share",
                reason: format!("{} is not a non-negative price", self.price_per_share),
            });
        }
        Ok(())
    }

    /// Dollar value of the purchase, rounded to whole dollars.
    pub fn cost_of_trade(&self) -> i64 {
        (self.shares.raw() as f64 * self.price_per_share).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_insider_types_joined_roundtrip() {
        let types: InsiderTypes = [InsiderType::Officer, InsiderType::Director]
            .into_iter()
            .collect();
        assert_eq!(types.to_joined(), "Director, Officer");
        assert_eq!(InsiderTypes::parse_joined("Director, Officer").unwrap(), types);
        assert!(InsiderTypes::parse_joined("").unwrap().is_empty());
        assert!(InsiderTypes::parse_joined("Janitor").is_err());
    }

    #[test]
    fn test_cost_of_trade_rounds() {
        let rec = InsiderBuyRecord::new(
            "0001-24-000001",
            " ACME ",
            date("2024-02-01"),
            date("2024-02-03"),
            InsiderTypes::new(),
            Shares(333),
            10.015,
        )
        .unwrap();
        assert_eq!(rec.ticker, "ACME");
        assert_eq!(rec.cost_of_trade(), 3335);
    }

    #[test]
    fn test_record_rejects_negative_price() {
        let err = InsiderBuyRecord::new(
            "0001-24-000001",
            "ACME",
            date("2024-02-01"),
            date("2024-02-03"),
            InsiderTypes::new(),
            Shares(1),
            -1.0,
        )
        .unwrap_err();
        assert!(matches!(err, TypesError::InvalidField { field: "price_per_share", .. }));
    }

    #[test]
    fn test_record_serde() {
        let rec = InsiderBuyRecord::new(
            "0001-24-000001",
            "ACME",
            date("2024-02-01"),
            date("2024-02-03"),
            [InsiderType::TenPercentOwner].into_iter().collect(),
            Shares(100),
            5.0,
        )
        .unwrap();
        let json = serde_json::to_string(&rec).unwrap();
        let back: InsiderBuyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
