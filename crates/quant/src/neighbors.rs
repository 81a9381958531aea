//! Nearest-neighbor extraction from a distance matrix.

use serde::{Deserialize, Serialize};
use types::Ticker;

use crate::error::{DomainError, InputError, Result};
use crate::matrix::DistanceMatrix;

/// The `k` nearest tickers to a target and how tightly they cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    /// Ticker the neighborhood was built around.
    pub target: Ticker,
    /// Neighbors in ascending distance order; never contains `target`.
    pub neighbors: Vec<Ticker>,
    /// Distances matching `neighbors`.
    pub distances: Vec<f64>,
    /// `k / Σ distance²`, the inverse mean squared distance.
    pub tightness: f64,
}

impl Neighborhood {
    pub fn k(&self) -> usize {
        self.neighbors.len()
    }

    /// Target followed by its neighbors.
    pub fn members(&self) -> Vec<&str> {
        std::iter::once(self.target.as_str())
            .chain(self.neighbors.iter().map(String::as_str))
            .collect()
    }
}

/// Find the `k` tickers closest to `target`.
///
/// The target is excluded by identity, so whatever sits on the diagonal never
/// takes part in the ranking. Ties keep column order.
///
/// # Errors
/// - [`InputError::UnknownTicker`] if `target` is not in the matrix.
/// - [`InputError::InvalidNeighborCount`] unless `1 <= k <= N - 1`.
/// - [`DomainError::DegenerateNeighborhood`] if all selected distances are 0.
pub fn find_neighbors(matrix: &DistanceMatrix, target: &str, k: usize) -> Result<Neighborhood> {
    let t = matrix
        .index_of(target)
        .ok_or_else(|| InputError::UnknownTicker(target.to_string()))?;

    let available = matrix.len() - 1;
    if k == 0 || k > available {
        return Err(InputError::InvalidNeighborCount { k, available }.into());
    }

    let mut candidates: Vec<(usize, f64)> = (0..matrix.len())
        .filter(|&j| j != t)
        .map(|j| (j, matrix.get(t, j)))
        .collect();
    // sort_by is stable: equal distances stay in column order.
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
    candidates.truncate(k);

    let sum_sq: f64 = candidates.iter().map(|(_, d)| d * d).sum();
    if sum_sq == 0.0 {
        return Err(DomainError::DegenerateNeighborhood(target.to_string()).into());
    }
    let tightness = k as f64 / sum_sq;
    if !tightness.is_finite() {
        return Err(DomainError::NonFinite(format!("tightness of {target}")).into());
    }

    let tickers = matrix.tickers();
    Ok(Neighborhood {
        target: target.to_string(),
        neighbors: candidates.iter().map(|&(j, _)| tickers[j].clone()).collect(),
        distances: candidates.iter().map(|&(_, d)| d).collect(),
        tightness,
    })
}
