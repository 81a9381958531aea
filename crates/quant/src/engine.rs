//! Lateral engine: one universe snapshot and its derived analytics.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────┐
//! │       LateralEngine       │
//! │  ┌─────────────────────┐  │
//! │  │ MultiPanel (prices) │  │
//! │  └─────────────────────┘  │
//! │            │              │
//! │            ▼              │
//! │  ┌─────────────────────┐  │
//! │  │ ReturnPanel         │  │
//! │  └─────────────────────┘  │
//! │            │              │
//! │            ▼              │
//! │  ┌─────────────────────┐  │
//! │  │ DistanceMatrix      │  │
//! │  │ (cached per metric) │  │
//! │  └─────────────────────┘  │
//! └───────────────────────────┘
//! ```
//!
//! Returns are computed once when the engine is built. Distance matrices are
//! built lazily on first request for a metric and reused afterwards; the
//! snapshot never changes, so cached matrices never go stale.
//!
//! ```ignore
//! let mut engine = LateralEngine::new(prices)?;
//! let hood = engine.neighborhood(MetricType::EWMA_DEFAULT, "AAPL", 4)?;
//! let features = engine.features(&hood)?;
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use types::{MetricType, MultiPanel, NaiveDate, ReturnPanel, Ticker};

use crate::calendar::{common_start_date, first_available_dates};
use crate::distance::DistanceMatrixBuilder;
use crate::error::{InputError, Result};
use crate::features::{FeatureMatrix, transform_features};
use crate::matrix::DistanceMatrix;
use crate::neighbors::{Neighborhood, find_neighbors};
use crate::returns::return_panel;
use crate::window::{EventWindow, event_window};

/// Analytics over a fixed universe of price panels.
pub struct LateralEngine {
    prices: MultiPanel,
    returns: ReturnPanel,
    force_sequential: bool,
    distances: HashMap<MetricType, DistanceMatrix>,
}

impl LateralEngine {
    /// Build an engine, computing every ticker's return series.
    pub fn new(prices: MultiPanel) -> Result<Self> {
        Self::with_options(prices, false)
    }

    /// Build an engine, optionally keeping all work on the calling thread.
    pub fn with_options(prices: MultiPanel, force_sequential: bool) -> Result<Self> {
        let returns = return_panel(&prices, force_sequential)?;
        Ok(Self {
            prices,
            returns,
            force_sequential,
            distances: HashMap::new(),
        })
    }

    pub fn prices(&self) -> &MultiPanel {
        &self.prices
    }

    pub fn returns(&self) -> &ReturnPanel {
        &self.returns
    }

    /// Whether a distance matrix for `metric` has already been built.
    pub fn is_cached(&self, metric: &MetricType) -> bool {
        self.distances.contains_key(metric)
    }

    /// Distance matrix for `metric`, building it on first use.
    pub fn distances(&mut self, metric: MetricType) -> Result<&DistanceMatrix> {
        match self.distances.entry(metric) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let matrix = DistanceMatrixBuilder::new(metric)
                    .force_sequential(self.force_sequential)
                    .build(&self.returns)?;
                Ok(e.insert(matrix))
            }
        }
    }

    /// Nearest `k` tickers to `target` under `metric`.
    pub fn neighborhood(&mut self, metric: MetricType, target: &str, k: usize) -> Result<Neighborhood> {
        let matrix = self.distances(metric)?;
        find_neighbors(matrix, target, k)
    }

    /// Feature matrix over the target and its neighbors, target first.
    pub fn features(&self, neighborhood: &Neighborhood) -> Result<FeatureMatrix> {
        let members = self.members(neighborhood)?;
        transform_features(&members)
    }

    /// Relative performance of the neighborhood around `event`.
    pub fn event_window(
        &self,
        neighborhood: &Neighborhood,
        event: NaiveDate,
        days_fwd: usize,
    ) -> Result<EventWindow> {
        let target = self
            .prices
            .get(&neighborhood.target)
            .ok_or_else(|| InputError::UnknownTicker(neighborhood.target.clone()))?;
        let neighbors = self.prices.select(&neighborhood.neighbors)?;
        event_window(target, &neighbors, event, days_fwd)
    }

    /// Common start date of the universe; see [`common_start_date`].
    pub fn start_date(&self, pad_days: u64) -> Option<(NaiveDate, Ticker)> {
        common_start_date(&first_available_dates(&self.prices), pad_days)
    }

    fn members(&self, neighborhood: &Neighborhood) -> Result<MultiPanel> {
        let members = neighborhood.members();
        if let Some(missing) = members.iter().find(|t| self.prices.get(t).is_none()) {
            return Err(InputError::UnknownTicker(missing.to_string()).into());
        }
        Ok(self.prices.select(&members)?)
    }
}

impl std::fmt::Debug for LateralEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LateralEngine")
            .field("tickers", &self.prices.len())
            .field("force_sequential", &self.force_sequential)
            .field("cached_metrics", &self.distances.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuantError;
    use types::{OhlcvBar, PricePanel};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn make_panel(ticker: &str, returns: &[f64]) -> PricePanel {
        let mut close = 100.0;
        let mut bars = vec![OhlcvBar::new(d(1), close, close * 1.01, close * 0.99, close, 1_000)];
        for (i, r) in returns.iter().enumerate() {
            close *= r.exp();
            let wiggle = 1.0 + 0.002 * ((i % 3) as f64 + 1.0);
            bars.push(OhlcvBar::new(
                d(i as u32 + 2),
                close,
                close * wiggle,
                close / (wiggle + 0.001 * (i % 2) as f64),
                close,
                1_000,
            ));
        }
        PricePanel::new(ticker, bars).unwrap()
    }

    fn make_prices() -> MultiPanel {
        let base = [0.01, -0.02, 0.015, 0.003, -0.007, 0.02, -0.01, 0.004, 0.011, -0.006];
        let other = [-0.01, 0.005, 0.002, -0.012, 0.009, 0.001, 0.007, -0.003, 0.0, 0.004];
        let near: Vec<f64> = base.iter().map(|x| x * 1.1 + 0.0005).collect();
        let mixed: Vec<f64> = base.iter().zip(&other).map(|(b, o)| 0.3 * b + o).collect();
        MultiPanel::from_panels(vec![
            make_panel("AAA", &base),
            make_panel("BBB", &near),
            make_panel("CCC", &other),
            make_panel("DDD", &mixed),
        ])
        .unwrap()
    }

    #[test]
    fn test_distances_cached_per_metric() {
        let mut engine = LateralEngine::new(make_prices()).unwrap();
        let metric = MetricType::Ewma { span: 20 };
        assert!(!engine.is_cached(&metric));

        let first = engine.distances(metric).unwrap().clone();
        assert!(engine.is_cached(&metric));
        assert_eq!(engine.distances(metric).unwrap(), &first);
        assert!(!engine.is_cached(&MetricType::Canonical));
    }

    #[test]
    fn test_neighborhood_and_features() {
        let mut engine = LateralEngine::new(make_prices()).unwrap();
        let hood = engine
            .neighborhood(MetricType::Ewma { span: 20 }, "AAA", 2)
            .unwrap();
        assert_eq!(hood.neighbors[0], "BBB");
        assert!(!hood.neighbors.contains(&"AAA".to_string()));

        let features = engine.features(&hood).unwrap();
        assert_eq!(features.ncols(), 9);
        assert_eq!(features.columns()[0], "AAA.lrh");
        assert_eq!(features.nrows(), 11);
    }

    #[test]
    fn test_event_window_through_engine() {
        let mut engine = LateralEngine::new(make_prices()).unwrap();
        let hood = engine
            .neighborhood(MetricType::Ewma { span: 20 }, "AAA", 1)
            .unwrap();
        let w = engine.event_window(&hood, d(5), 3).unwrap();
        assert_eq!(w.bounds.normalize, d(4));
        assert_eq!(w.neighbors.len(), 1);
        assert_eq!(w.target.points.len(), 6);
    }

    #[test]
    fn test_unknown_target() {
        let mut engine = LateralEngine::new(make_prices()).unwrap();
        let err = engine
            .neighborhood(MetricType::EWMA_DEFAULT, "ZZZ", 2)
            .unwrap_err();
        assert_eq!(err, QuantError::Input(InputError::UnknownTicker("ZZZ".into())));
    }

    #[test]
    fn test_start_date() {
        let engine = LateralEngine::new(make_prices()).unwrap();
        let (start, ticker) = engine.start_date(3).unwrap();
        assert_eq!(start, d(4));
        assert_eq!(ticker, "AAA");
    }

    #[test]
    fn test_empty_universe() {
        assert_eq!(
            LateralEngine::new(MultiPanel::new()).unwrap_err(),
            QuantError::Input(InputError::EmptyUniverse)
        );
    }
}
