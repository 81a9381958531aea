//! Return-correlation analytics for insider-buy screening.
//!
//! This crate turns daily price panels into log-return series, measures how
//! closely tickers move together, and extracts the nearest neighbors of a
//! target ticker along with a tightness score.
//!
//! # Modules
//!
//! - [`returns`] - Log-return series from OHLCV panels
//! - [`ewma`] - Exponentially weighted correlation (pairwise and panel)
//! - [`canonical`] - Maximum canonical correlation
//! - [`metric`] - Pluggable similarity metrics
//! - [`distance`] - Pairwise distance-matrix construction
//! - [`neighbors`] - k-nearest neighbors and tightness
//! - [`features`] - Flattened neighborhood feature matrix
//! - [`window`] - Relative performance around an event date
//! - [`calendar`] - Common analysis start date
//! - [`screen`] - Ranking insider buys by tightness
//! - [`engine`] - Universe snapshot with cached distance matrices
//!
//! # Example
//!
//! ```
//! use quant::{build_distance_matrix, find_neighbors, returns::return_panel};
//! use types::{MetricType, MultiPanel, NaiveDate, OhlcvBar, PricePanel};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let panel = |t: &str, closes: &[f64]| {
//!     let bars = closes
//!         .iter()
//!         .enumerate()
//!         .map(|(i, &c)| OhlcvBar::flat(day(i as u32 + 1), c))
//!         .collect();
//!     PricePanel::new(t, bars).unwrap()
//! };
//! let prices = MultiPanel::from_panels(vec![
//!     panel("AAA", &[10.0, 10.5, 10.2, 10.8, 11.0]),
//!     panel("BBB", &[20.0, 21.1, 20.3, 21.5, 22.1]),
//!     panel("CCC", &[5.0, 4.8, 5.1, 4.9, 4.7]),
//! ])
//! .unwrap();
//!
//! let returns = return_panel(&prices, false).unwrap();
//! let distances = build_distance_matrix(&returns, MetricType::Ewma { span: 10 }).unwrap();
//! let hood = find_neighbors(&distances, "AAA", 1).unwrap();
//! assert_eq!(hood.neighbors, vec!["BBB"]);
//! ```
//!
//! # Design Notes
//!
//! - Correlation engines return similarities; distance is `1 - similarity`,
//!   applied only by the distance layer
//! - Numeric failures (zero variance, singular covariance) are typed errors
//! - The pair loop may run on rayon through the `parallel` crate

pub mod calendar;
pub mod canonical;
pub mod distance;
pub mod engine;
pub mod error;
pub mod ewma;
pub mod features;
pub mod matrix;
pub mod metric;
pub mod neighbors;
pub mod returns;
pub mod screen;
pub mod stats;
pub mod window;

// Re-export main types at crate root for convenience
pub use canonical::{canonical_correlation_series, max_canonical_correlation};
pub use distance::{DistanceMatrixBuilder, build_distance_matrix};
pub use engine::LateralEngine;
pub use error::{DomainError, InputError, QuantError, Result};
pub use ewma::{ewma_correlation, ewma_correlation_matrix, ewma_correlation_series};
pub use features::{FeatureMatrix, FeatureTable, transform_features};
pub use matrix::{CorrelationMatrix, DistanceMatrix, MatrixTable};
pub use metric::{CanonicalMetric, EwmaMetric, SimilarityMetric, create_metric};
pub use neighbors::{Neighborhood, find_neighbors};
pub use returns::{log_returns, return_panel};
pub use screen::{LateralCandidate, ScreenConfig, ScreenOutcome, SkippedRecord, screen};
pub use window::{EventWindow, RelativeSeries, WindowBounds, event_window};
