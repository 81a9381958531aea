//! Distance-matrix construction over a return panel.
//!
//! Every unordered pair `i < j` is evaluated exactly once and written to both
//! `(i, j)` and `(j, i)`; the diagonal stays zero. Evaluation is exact and
//! O(N²) in the number of tickers. Pairs are independent, so they may run on
//! the rayon pool; assembly into the matrix is single threaded with each cell
//! written once.

use nalgebra::DMatrix;
use types::{MetricType, ReturnPanel, Ticker};

use crate::error::{InputError, Result};
use crate::matrix::{DistanceMatrix, to_distance};
use crate::metric::{SimilarityMetric, create_metric};

/// Builds [`DistanceMatrix`] values with a configured metric.
pub struct DistanceMatrixBuilder {
    metric: Box<dyn SimilarityMetric>,
    force_sequential: bool,
}

impl DistanceMatrixBuilder {
    pub fn new(metric_type: MetricType) -> Self {
        Self::with_metric(create_metric(metric_type))
    }

    /// Use a custom metric implementation.
    pub fn with_metric(metric: Box<dyn SimilarityMetric>) -> Self {
        Self {
            metric,
            force_sequential: false,
        }
    }

    /// Evaluate pairs on the calling thread even when `parallel` is enabled.
    pub fn force_sequential(mut self, force_sequential: bool) -> Self {
        self.force_sequential = force_sequential;
        self
    }

    pub fn metric_type(&self) -> MetricType {
        self.metric.metric_type()
    }

    /// Build the distance matrix for `panel`.
    ///
    /// Fails with the first pair error encountered; no cell is ever filled
    /// with a substitute value.
    pub fn build(&self, panel: &ReturnPanel) -> Result<DistanceMatrix> {
        if panel.is_empty() {
            return Err(InputError::EmptyUniverse.into());
        }
        let series = panel.series();
        let n = series.len();

        let triples = parallel::try_map_pairs(
            n,
            |i, j| {
                self.metric
                    .similarity(&series[i], &series[j])
                    .map(to_distance)
            },
            self.force_sequential,
        )?;

        let mut values = DMatrix::<f64>::zeros(n, n);
        for (i, j, d) in triples {
            values[(i, j)] = d;
            values[(j, i)] = d;
        }

        let tickers: Vec<Ticker> = panel.tickers().into_iter().map(String::from).collect();
        Ok(DistanceMatrix::from_raw(tickers, values))
    }
}

impl std::fmt::Debug for DistanceMatrixBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceMatrixBuilder")
            .field("metric", &self.metric.metric_type())
            .field("force_sequential", &self.force_sequential)
            .finish()
    }
}

/// Build a distance matrix with the given metric.
pub fn build_distance_matrix(panel: &ReturnPanel, metric: MetricType) -> Result<DistanceMatrix> {
    DistanceMatrixBuilder::new(metric).build(panel)
}
