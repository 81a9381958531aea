//! Flattening a neighborhood's returns into one feature matrix.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use types::{MultiPanel, NaiveDate, ReturnColumn, ReturnSeries};

use crate::error::{InputError, Result};
use crate::returns::log_returns;

/// Dates × (3 · tickers) matrix of high/low/close log-returns.
///
/// Columns are grouped per ticker in panel order: `T.lrh`, `T.lrl`, `T.lrc`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    values: DMatrix<f64>,
}

impl FeatureMatrix {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Column by label, e.g. `"AAPL.lrc"`.
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let j = self.columns.iter().position(|c| c == label)?;
        Some(self.values.column(j).iter().copied().collect())
    }

    /// Row-major snapshot for reporting.
    pub fn to_table(&self) -> FeatureTable {
        FeatureTable {
            dates: self.dates.clone(),
            columns: self.columns.clone(),
            rows: (0..self.nrows())
                .map(|i| self.values.row(i).iter().copied().collect())
                .collect(),
        }
    }
}

/// Plain representation of a [`FeatureMatrix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

fn column_label(ticker: &str, column: ReturnColumn) -> String {
    format!("{ticker}.{}", column.label())
}

/// Build the feature matrix for a neighborhood's price panels.
///
/// # Errors
/// - [`InputError::EmptyUniverse`] for an empty panel set.
/// - [`InputError::MisalignedSeries`] if the tickers' date indexes differ.
/// - Any error from [`log_returns`].
pub fn transform_features(prices: &MultiPanel) -> Result<FeatureMatrix> {
    if prices.is_empty() {
        return Err(InputError::EmptyUniverse.into());
    }
    let series: Vec<ReturnSeries> = prices.iter().map(log_returns).collect::<Result<_>>()?;

    let first = &series[0];
    if let Some(other) = series.iter().skip(1).find(|s| s.dates() != first.dates()) {
        return Err(InputError::MisalignedSeries {
            left: first.ticker().to_string(),
            right: other.ticker().to_string(),
        }
        .into());
    }

    let width = ReturnColumn::ALL.len();
    let columns = series
        .iter()
        .flat_map(|s| ReturnColumn::ALL.iter().map(|&c| column_label(s.ticker(), c)))
        .collect();
    let values = DMatrix::from_fn(first.len(), series.len() * width, |r, c| {
        series[c / width].rows()[r].get(ReturnColumn::ALL[c % width])
    });

    Ok(FeatureMatrix {
        dates: first.dates().to_vec(),
        columns,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuantError;
    use types::{OhlcvBar, PricePanel};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn panel(ticker: &str, start: u32, closes: &[f64]) -> PricePanel {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar::new(d(start + i as u32), c, c * 1.02, c * 0.97, c, 1_000))
            .collect();
        PricePanel::new(ticker, bars).unwrap()
    }

    #[test]
    fn test_layout_and_values() {
        let prices = MultiPanel::from_panels(vec![
            panel("AAA", 1, &[10.0, 11.0, 12.1]),
            panel("BBB", 1, &[50.0, 45.0, 45.0]),
        ])
        .unwrap();
        let f = transform_features(&prices).unwrap();

        assert_eq!(f.nrows(), 3);
        assert_eq!(f.ncols(), 6);
        assert_eq!(
            f.columns(),
            ["AAA.lrh", "AAA.lrl", "AAA.lrc", "BBB.lrh", "BBB.lrl", "BBB.lrc"]
        );
        assert_eq!(f.dates(), [d(1), d(2), d(3)]);

        // First row all zero.
        assert!(f.values().row(0).iter().all(|&v| v == 0.0));

        let lrc = f.column("AAA.lrc").unwrap();
        assert!((lrc[1] - 1.1f64.ln()).abs() < 1e-12);
        assert!((lrc[2] - 1.1f64.ln()).abs() < 1e-12);
        let lrh = f.column("BBB.lrh").unwrap();
        assert!((lrh[1] - (45.0 * 1.02 / 50.0f64).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_misaligned_dates_rejected() {
        let prices = MultiPanel::from_panels(vec![
            panel("AAA", 1, &[10.0, 11.0, 12.0]),
            panel("BBB", 2, &[10.0, 11.0, 12.0]),
        ])
        .unwrap();
        assert_eq!(
            transform_features(&prices).unwrap_err(),
            QuantError::Input(InputError::MisalignedSeries {
                left: "AAA".into(),
                right: "BBB".into()
            })
        );
    }

    #[test]
    fn test_empty_universe() {
        assert_eq!(
            transform_features(&MultiPanel::new()).unwrap_err(),
            QuantError::Input(InputError::EmptyUniverse)
        );
    }

    #[test]
    fn test_table_has_row_per_date() {
        let prices = MultiPanel::from_panels(vec![panel("AAA", 1, &[10.0, 11.0])]).unwrap();
        let table = transform_features(&prices).unwrap().to_table();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].len(), 3);
    }
}
