//! Pairwise similarity metrics over return series.
//!
//! A metric turns two [`ReturnSeries`] into a similarity score; the distance
//! matrix builder converts it with [`crate::matrix::to_distance`]. New metrics
//! plug in by implementing [`SimilarityMetric`] and extending
//! [`create_metric`].

use types::{MetricType, ReturnSeries};

use crate::canonical::canonical_correlation_series;
use crate::error::Result;
use crate::ewma::ewma_correlation_series;

/// Trait for pairwise similarity metrics.
pub trait SimilarityMetric: Send + Sync {
    /// The type of this metric (for reporting and configuration).
    fn metric_type(&self) -> MetricType;

    /// Similarity of two series; higher means closer.
    fn similarity(&self, a: &ReturnSeries, b: &ReturnSeries) -> Result<f64>;
}

/// EWMA correlation of close returns.
#[derive(Debug, Clone, Copy)]
pub struct EwmaMetric {
    span: u32,
}

impl EwmaMetric {
    pub fn new(span: u32) -> Self {
        Self { span }
    }
}

impl SimilarityMetric for EwmaMetric {
    fn metric_type(&self) -> MetricType {
        MetricType::Ewma { span: self.span }
    }

    fn similarity(&self, a: &ReturnSeries, b: &ReturnSeries) -> Result<f64> {
        ewma_correlation_series(a, b, self.span)
    }
}

/// Maximum canonical correlation of the high/low/close return blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalMetric;

impl SimilarityMetric for CanonicalMetric {
    fn metric_type(&self) -> MetricType {
        MetricType::Canonical
    }

    fn similarity(&self, a: &ReturnSeries, b: &ReturnSeries) -> Result<f64> {
        canonical_correlation_series(a, b)
    }
}

/// Create a metric from its type specification.
pub fn create_metric(metric_type: MetricType) -> Box<dyn SimilarityMetric> {
    match metric_type {
        MetricType::Ewma { span } => Box::new(EwmaMetric::new(span)),
        MetricType::Canonical => Box::new(CanonicalMetric),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_roundtrips_type() {
        for t in [MetricType::Ewma { span: 42 }, MetricType::Canonical] {
            assert_eq!(create_metric(t).metric_type(), t);
        }
    }
}
