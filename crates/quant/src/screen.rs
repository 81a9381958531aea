//! Ranking insider buys by neighborhood tightness.
//!
//! A buy whose ticker sits in a tight neighborhood has close peers whose
//! post-event moves can be compared against the target's. Records whose
//! neighborhood cannot be built are reported back and logged, never given a
//! placeholder score.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use types::{InsiderBuyRecord, NaiveDate, Ticker};

use crate::error::{QuantError, Result};
use crate::matrix::DistanceMatrix;
use crate::neighbors::{Neighborhood, find_neighbors};

/// Screening parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Neighbors per target.
    pub k: usize,
    /// Records with a trade date before this are ignored.
    pub start_date: Option<NaiveDate>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            k: 4,
            start_date: None,
        }
    }
}

/// An insider buy paired with its ticker's neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateralCandidate {
    pub record: InsiderBuyRecord,
    pub neighborhood: Neighborhood,
}

impl LateralCandidate {
    pub fn tightness(&self) -> f64 {
        self.neighborhood.tightness
    }
}

/// A record that could not be scored, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub record: InsiderBuyRecord,
    pub error: QuantError,
}

/// Result of a screening pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenOutcome {
    /// Scored records, tightest neighborhood first.
    pub candidates: Vec<LateralCandidate>,
    /// Records dropped by the start-date filter.
    pub before_start: usize,
    /// Records whose neighborhood failed.
    pub skipped: Vec<SkippedRecord>,
}

/// Rank `records` by the tightness of their tickers' neighborhoods.
///
/// Ordering: tightness descending, then cost of trade descending, then
/// accession number for determinism. Neighborhoods are computed once per
/// ticker.
pub fn screen(
    records: &[InsiderBuyRecord],
    distances: &DistanceMatrix,
    config: &ScreenConfig,
) -> ScreenOutcome {
    let mut outcome = ScreenOutcome::default();
    let mut cache: HashMap<Ticker, Result<Neighborhood>> = HashMap::new();

    for record in records {
        if config.start_date.is_some_and(|start| record.trade_date < start) {
            outcome.before_start += 1;
            continue;
        }

        let neighborhood = cache
            .entry(record.ticker.clone())
            .or_insert_with(|| find_neighbors(distances, &record.ticker, config.k));

        match neighborhood {
            Ok(n) => outcome.candidates.push(LateralCandidate {
                record: record.clone(),
                neighborhood: n.clone(),
            }),
            Err(e) => {
                warn!(
                    accession = %record.accession,
                    ticker = %record.ticker,
                    error = %e,
                    "skipping insider buy"
                );
                outcome.skipped.push(SkippedRecord {
                    record: record.clone(),
                    error: e.clone(),
                });
            }
        }
    }

    outcome.candidates.sort_by(|a, b| {
        b.tightness()
            .total_cmp(&a.tightness())
            .then_with(|| b.record.cost_of_trade().cmp(&a.record.cost_of_trade()))
            .then_with(|| a.record.accession.cmp(&b.record.accession))
    });

    debug!(
        scored = outcome.candidates.len(),
        skipped = outcome.skipped.len(),
        before_start = outcome.before_start,
        "screening complete"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use types::{InsiderType, InsiderTypes, Shares};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn buy(acc: &str, ticker: &str, day: u32, shares: u64, price: f64) -> InsiderBuyRecord {
        let types: InsiderTypes = [InsiderType::Director].into_iter().collect();
        InsiderBuyRecord::new(acc, ticker, d(day), d(day + 1), types, Shares(shares), price).unwrap()
    }

    /// A-B tight, C-D loose.
    fn matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(
            ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect(),
            vec![
                vec![0.0, 0.1, 0.9, 0.8],
                vec![0.1, 0.0, 0.7, 0.9],
                vec![0.9, 0.7, 0.0, 0.5],
                vec![0.8, 0.9, 0.5, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ranked_by_tightness_then_cost() {
        let records = vec![
            buy("3", "C", 10, 100, 10.0),
            buy("1", "A", 10, 10, 1.0),
            buy("2", "A", 11, 1_000, 1.0),
            buy("4", "B", 12, 5, 5.0),
        ];
        let outcome = screen(&records, &matrix(), &ScreenConfig { k: 1, start_date: None });
        let order: Vec<&str> = outcome
            .candidates
            .iter()
            .map(|c| c.record.accession.as_str())
            .collect();
        // A and B both have a neighbor at 0.1; larger trade first within A.
        assert_eq!(order, vec!["2", "4", "1", "3"]);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_start_date_filter() {
        let records = vec![buy("1", "A", 1, 10, 1.0), buy("2", "A", 20, 10, 1.0)];
        let outcome = screen(
            &records,
            &matrix(),
            &ScreenConfig {
                k: 2,
                start_date: Some(d(15)),
            },
        );
        assert_eq!(outcome.before_start, 1);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].record.accession.as_str(), "2");
    }

    #[test]
    fn test_unknown_ticker_reported() {
        let records = vec![buy("1", "ZZZ", 5, 10, 1.0), buy("2", "A", 5, 10, 1.0)];
        let outcome = screen(&records, &matrix(), &ScreenConfig { k: 2, start_date: None });
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(
            outcome.skipped[0].error,
            QuantError::Input(InputError::UnknownTicker("ZZZ".into()))
        );
    }

    #[test]
    fn test_invalid_k_skips_everything() {
        let records = vec![buy("1", "A", 5, 10, 1.0)];
        let outcome = screen(&records, &matrix(), &ScreenConfig { k: 9, start_date: None });
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
    }
}
