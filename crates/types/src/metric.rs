//! Similarity metric selection for distance-matrix construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Pairwise similarity metric used to build a distance matrix.
///
/// Distances are always `1 - similarity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricType {
    /// Exponentially weighted correlation of close log-returns.
    Ewma {
        /// Decay span; `alpha = 2 / (span + 1)`.
        span: u32,
    },
    /// Maximum canonical correlation of the high/low/close return block.
    Canonical,
}

impl MetricType {
    /// Span used by the pairwise EWMA path unless configured otherwise.
    pub const DEFAULT_SPAN: u32 = 100;

    pub const EWMA_DEFAULT: Self = Self::Ewma {
        span: Self::DEFAULT_SPAN,
    };
}

impl Default for MetricType {
    fn default() -> Self {
        Self::EWMA_DEFAULT
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricType::Ewma { span } => write!(f, "ewma:{}", span),
            MetricType::Canonical => write!(f, "canonical"),
        }
    }
}

impl FromStr for MetricType {
    type Err = TypesError;

    /// Accepts `ewma`, `ewma:<span>` and `canonical`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let invalid = || TypesError::InvalidField {
            field: "metric",
            reason: format!("expected ewma[:span] or canonical, got {:?}", s),
        };
        match s.split_once(':') {
            None if s == "ewma" => Ok(Self::EWMA_DEFAULT),
            None if s == "canonical" => Ok(Self::Canonical),
            Some(("ewma", span)) => span
                .parse()
                .map(|span| Self::Ewma { span })
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}
