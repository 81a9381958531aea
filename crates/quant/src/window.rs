//! Relative price performance around an insider-buy event.
//!
//! The window runs from two sessions before the event to `days_fwd` sessions
//! after it, clipped to the target's history. Every close is divided by the
//! close of the session before the event, so all tickers start near 1.0.

use serde::{Deserialize, Serialize};
use types::{MultiPanel, NaiveDate, PricePanel, Ticker};

use crate::error::{DomainError, QuantError, Result};

/// Session bounds of an event window, taken from the target's date index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub start: NaiveDate,
    pub normalize: NaiveDate,
    pub event: NaiveDate,
    pub end: NaiveDate,
}

/// One ticker's normalized closes over the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeSeries {
    pub ticker: Ticker,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Target and neighbor performance around an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWindow {
    pub bounds: WindowBounds,
    pub target: RelativeSeries,
    pub neighbors: Vec<RelativeSeries>,
}

fn bounds(target: &PricePanel, event: NaiveDate, days_fwd: usize) -> Result<WindowBounds> {
    let idx = target.position(event).ok_or_else(|| {
        QuantError::data_gap(target.ticker(), format!("no session on event date {event}"))
    })?;
    let bars = target.bars();
    let end = (idx + days_fwd).min(bars.len() - 1);
    Ok(WindowBounds {
        start: bars[idx.saturating_sub(2)].date,
        normalize: bars[idx.saturating_sub(1)].date,
        event,
        end: bars[end].date,
    })
}

fn check_close(panel: &PricePanel, date: NaiveDate, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        return Ok(());
    }
    Err(DomainError::NonPositivePrice {
        ticker: panel.ticker().to_string(),
        date,
        value,
    }
    .into())
}

fn relative(panel: &PricePanel, bounds: &WindowBounds) -> Result<RelativeSeries> {
    let base = panel.bar_on(bounds.normalize).ok_or_else(|| {
        QuantError::data_gap(
            panel.ticker(),
            format!("no close on normalization date {}", bounds.normalize),
        )
    })?;
    check_close(panel, base.date, base.close)?;
    let base = base.close;
    let points = panel
        .between(bounds.start, bounds.end)
        .bars()
        .iter()
        .map(|b| {
            check_close(panel, b.date, b.close)?;
            Ok((b.date, b.close / base))
        })
        .collect::<Result<_>>()?;
    Ok(RelativeSeries {
        ticker: panel.ticker().to_string(),
        points,
    })
}

/// Normalized closes of `target` and each neighbor around `event`.
///
/// # Errors
/// [`QuantError::DataGap`] if the target has no session on `event`, or any
/// ticker lacks a close on the normalization session.
/// [`DomainError::NonPositivePrice`] if a close inside the window, or the
/// normalization close, is not strictly positive.
pub fn event_window(
    target: &PricePanel,
    neighbors: &MultiPanel,
    event: NaiveDate,
    days_fwd: usize,
) -> Result<EventWindow> {
    let bounds = bounds(target, event, days_fwd)?;
    let target_series = relative(target, &bounds)?;
    let neighbor_series = neighbors
        .iter()
        .map(|p| relative(p, &bounds))
        .collect::<Result<_>>()?;
    Ok(EventWindow {
        bounds,
        target: target_series,
        neighbors: neighbor_series,
    })
}
