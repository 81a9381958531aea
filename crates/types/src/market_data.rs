//! Daily OHLCV price data.
//!
//! A [`PricePanel`] holds one ticker's bars in strictly increasing date order.
//! A [`MultiPanel`] is the long-format collection of panels for a universe,
//! keeping tickers in first-appearance order so every downstream column
//! ordering is deterministic.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TypesError};
use crate::ids::Ticker;

// =============================================================================
// OHLCV Bar
// =============================================================================

/// One trading session of price data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Session date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price during the session.
    pub high: f64,
    /// Lowest price during the session.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: u64,
}

impl OhlcvBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar with all four prices equal to `close`. Handy for close-only data.
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        Self::new(date, close, close, close, close, 0)
    }
}

// =============================================================================
// Price Panel
// =============================================================================

/// Date-ordered OHLCV history for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePanel {
    ticker: Ticker,
    bars: Vec<OhlcvBar>,
}

impl PricePanel {
    /// Build a panel, checking that dates are strictly increasing.
    pub fn new(ticker: impl Into<Ticker>, bars: Vec<OhlcvBar>) -> Result<Self> {
        let ticker = ticker.into();
        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(TypesError::UnorderedDates {
                ticker,
                date: w[1].date,
            });
        }
        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    /// Row index of `date`, if the ticker traded that day.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }

    /// Bar on `date`, if present.
    pub fn bar_on(&self, date: NaiveDate) -> Option<&OhlcvBar> {
        self.position(date).map(|i| &self.bars[i])
    }

    /// Sub-panel with dates in `[from, to]` (inclusive).
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> PricePanel {
        let bars = self
            .bars
            .iter()
            .filter(|b| b.date >= from && b.date <= to)
            .copied()
            .collect();
        PricePanel {
            ticker: self.ticker.clone(),
            bars,
        }
    }
}

// =============================================================================
// Multi Panel
// =============================================================================

/// Price panels for a universe of tickers, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPanel {
    panels: Vec<PricePanel>,
}

impl MultiPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from panels, rejecting duplicate tickers.
    pub fn from_panels(panels: Vec<PricePanel>) -> Result<Self> {
        let mut multi = Self::new();
        for panel in panels {
            multi.push(panel)?;
        }
        Ok(multi)
    }

    /// Build from long-format `(ticker, bar)` rows.
    ///
    /// Tickers keep the order in which they first appear. Rows of one ticker
    /// may arrive in any order; they are sorted by date and duplicates are
    /// rejected.
    pub fn from_long<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Ticker, OhlcvBar)>,
    {
        let mut order: Vec<Ticker> = Vec::new();
        let mut grouped: HashMap<Ticker, Vec<OhlcvBar>> = HashMap::new();

        for (ticker, bar) in rows {
            let entry = grouped.entry(ticker.clone()).or_insert_with(|| {
                order.push(ticker);
                Vec::new()
            });
            entry.push(bar);
        }

        let mut panels = Vec::with_capacity(order.len());
        for ticker in order {
            let mut bars = grouped.remove(&ticker).unwrap_or_default();
            bars.sort_by_key(|b| b.date);
            panels.push(PricePanel::new(ticker, bars)?);
        }
        Ok(Self { panels })
    }

    /// Append a panel. Fails if its ticker is already present.
    pub fn push(&mut self, panel: PricePanel) -> Result<()> {
        if self.get(panel.ticker()).is_some() {
            return Err(TypesError::DuplicateTicker(panel.ticker.clone()));
        }
        self.panels.push(panel);
        Ok(())
    }

    pub fn get(&self, ticker: &str) -> Option<&PricePanel> {
        self.panels.iter().find(|p| p.ticker == ticker)
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.panels.iter().map(|p| p.ticker()).collect()
    }

    pub fn panels(&self) -> &[PricePanel] {
        &self.panels
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePanel> {
        self.panels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panels for `tickers`, in the order given.
    pub fn select<S: AsRef<str>>(&self, tickers: &[S]) -> Result<MultiPanel> {
        let mut panels = Vec::with_capacity(tickers.len());
        for t in tickers {
            let panel = self
                .get(t.as_ref())
                .ok_or_else(|| TypesError::UnknownTicker(t.as_ref().to_string()))?;
            panels.push(panel.clone());
        }
        MultiPanel::from_panels(panels)
    }

    /// Restrict every panel to dates in `[from, to]`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> MultiPanel {
        MultiPanel {
            panels: self.panels.iter().map(|p| p.between(from, to)).collect(),
        }
    }
}
