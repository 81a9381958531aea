//! Ticker-labelled square matrices.
//!
//! Correlation engines produce a [`CorrelationMatrix`]; the distance layer
//! produces a [`DistanceMatrix`]. Conversion between the two happens in one
//! place, [`to_distance`], so every distance in the system is
//! `1 - similarity` with a zero diagonal.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use types::Ticker;

use crate::error::{InputError, Result};

/// Convert a similarity score (correlation) into a distance.
#[inline]
pub fn to_distance(similarity: f64) -> f64 {
    1.0 - similarity
}

fn index_of(tickers: &[Ticker], ticker: &str) -> Option<usize> {
    tickers.iter().position(|t| t == ticker)
}

// =============================================================================
// Correlation Matrix
// =============================================================================

/// Symmetric ticker × ticker correlation matrix with a unit diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    tickers: Vec<Ticker>,
    values: DMatrix<f64>,
}

impl CorrelationMatrix {
    /// Wrap computed values; the diagonal is forced to 1.0.
    pub(crate) fn from_raw(tickers: Vec<Ticker>, mut values: DMatrix<f64>) -> Self {
        debug_assert_eq!(values.nrows(), tickers.len());
        values.fill_diagonal(1.0);
        Self { tickers, values }
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Correlation between two tickers, if both are present.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = index_of(&self.tickers, a)?;
        let j = index_of(&self.tickers, b)?;
        Some(self.get(i, j))
    }

    /// Distance form of this matrix: `1 - correlation`, zero diagonal.
    pub fn to_distance(&self) -> DistanceMatrix {
        DistanceMatrix {
            tickers: self.tickers.clone(),
            values: self.values.map(to_distance),
        }
    }

    pub fn to_table(&self) -> MatrixTable {
        table(&self.tickers, &self.values)
    }
}

fn table(tickers: &[Ticker], values: &DMatrix<f64>) -> MatrixTable {
    MatrixTable {
        tickers: tickers.to_vec(),
        rows: (0..values.nrows())
            .map(|i| values.row(i).iter().copied().collect())
            .collect(),
    }
}

// =============================================================================
// Distance Matrix
// =============================================================================

/// Symmetric ticker × ticker distance matrix.
///
/// Built once per universe snapshot and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    tickers: Vec<Ticker>,
    values: DMatrix<f64>,
}

impl DistanceMatrix {
    pub(crate) fn from_raw(tickers: Vec<Ticker>, values: DMatrix<f64>) -> Self {
        debug_assert_eq!(values.nrows(), tickers.len());
        debug_assert_eq!(values.ncols(), tickers.len());
        Self { tickers, values }
    }

    /// Build from row vectors, validating shape, symmetry and finiteness.
    ///
    /// The diagonal is taken as given; neighbor search never reads it.
    pub fn from_rows(tickers: Vec<Ticker>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = tickers.len();
        if rows.len() != n || rows.iter().any(|r| r.len() != n) {
            return Err(InputError::MalformedMatrix(format!("expected {n}x{n} values")).into());
        }
        for (i, t) in tickers.iter().enumerate() {
            if tickers[..i].contains(t) {
                return Err(InputError::MalformedMatrix(format!("duplicate ticker {t}")).into());
            }
        }
        let values = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
        for i in 0..n {
            for j in 0..n {
                let v = values[(i, j)];
                if !v.is_finite() {
                    return Err(InputError::MalformedMatrix(format!(
                        "{}/{} is not finite",
                        tickers[i], tickers[j]
                    ))
                    .into());
                }
                if v != values[(j, i)] {
                    return Err(InputError::MalformedMatrix(format!(
                        "{}/{} is not symmetric",
                        tickers[i], tickers[j]
                    ))
                    .into());
                }
            }
        }
        Ok(Self { tickers, values })
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn index_of(&self, ticker: &str) -> Option<usize> {
        index_of(&self.tickers, ticker)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Distance between two tickers, if both are present.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.get(self.index_of(a)?, self.index_of(b)?))
    }

    /// Row of distances from `ticker`, in column order.
    pub fn row(&self, ticker: &str) -> Option<Vec<f64>> {
        let i = self.index_of(ticker)?;
        Some(self.values.row(i).iter().copied().collect())
    }

    /// Serializable snapshot (tickers plus row-major values).
    pub fn to_table(&self) -> MatrixTable {
        table(&self.tickers, &self.values)
    }
}

/// Plain representation of a labelled matrix for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixTable {
    pub tickers: Vec<Ticker>,
    pub rows: Vec<Vec<f64>>,
}

impl TryFrom<MatrixTable> for DistanceMatrix {
    type Error = crate::error::QuantError;

    fn try_from(table: MatrixTable) -> Result<Self> {
        DistanceMatrix::from_rows(table.tickers, table.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers(names: &[&str]) -> Vec<Ticker> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_correlation_diagonal_forced() {
        let values = DMatrix::from_row_slice(2, 2, &[0.7, 0.2, 0.2, 0.9]);
        let corr = CorrelationMatrix::from_raw(tickers(&["A", "B"]), values);
        assert_eq!(corr.get(0, 0), 1.0);
        assert_eq!(corr.get(1, 1), 1.0);
        assert_eq!(corr.between("A", "B"), Some(0.2));
    }

    #[test]
    fn test_correlation_to_distance() {
        let values = DMatrix::from_row_slice(2, 2, &[1.0, -0.5, -0.5, 1.0]);
        let dist = CorrelationMatrix::from_raw(tickers(&["A", "B"]), values).to_distance();
        assert_eq!(dist.get(0, 0), 0.0);
        assert_eq!(dist.between("A", "B"), Some(1.5));
        assert_eq!(dist.between("B", "A"), Some(1.5));
    }

    #[test]
    fn test_from_rows_rejects_asymmetry() {
        let err = DistanceMatrix::from_rows(tickers(&["A", "B"]), vec![vec![0.0, 1.0], vec![2.0, 0.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let err = DistanceMatrix::from_rows(tickers(&["A", "B"]), vec![vec![0.0, 1.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn test_table_roundtrip() {
        let m = DistanceMatrix::from_rows(tickers(&["A", "B"]), vec![vec![0.0, 0.3], vec![0.3, 0.0]])
            .unwrap();
        let back = DistanceMatrix::try_from(m.to_table()).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.row("B"), Some(vec![0.3, 0.0]));
    }
}
