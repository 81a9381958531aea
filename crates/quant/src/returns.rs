//! Daily log-returns from OHLCV panels.
//!
//! Each row is measured against the previous session's close:
//! `lrh = ln(high / prev_close)`, `lrl = ln(low / prev_close)`,
//! `lrc = ln(close / prev_close)`. The first row has no previous close and is
//! exactly zero.

use types::{LogReturns, MultiPanel, OhlcvBar, PricePanel, ReturnPanel, ReturnSeries};

use crate::error::{DomainError, InputError, QuantError, Result};

/// Compute the return series of one ticker.
///
/// # Errors
/// - [`InputError::EmptySeries`] for a panel with no rows.
/// - [`DomainError::NonPositivePrice`] if any close, or any high/low after
///   the first row, is not strictly positive.
pub fn log_returns(panel: &PricePanel) -> Result<ReturnSeries> {
    let bars = panel.bars();
    if bars.is_empty() {
        return Err(InputError::EmptySeries(panel.ticker().to_string()).into());
    }

    let mut rows = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        check_positive(panel, bar, bar.close)?;
        if i == 0 {
            rows.push(LogReturns::ZERO);
            continue;
        }
        check_positive(panel, bar, bar.high)?;
        check_positive(panel, bar, bar.low)?;

        let prev_close = bars[i - 1].close;
        rows.push(LogReturns {
            high: (bar.high / prev_close).ln(),
            low: (bar.low / prev_close).ln(),
            close: (bar.close / prev_close).ln(),
        });
    }

    Ok(ReturnSeries::new(panel.ticker(), panel.dates(), rows)?)
}

/// Compute return series for every ticker of a universe, keeping its order.
pub fn return_panel(prices: &MultiPanel, force_sequential: bool) -> Result<ReturnPanel> {
    if prices.is_empty() {
        return Err(InputError::EmptyUniverse.into());
    }
    let series = parallel::try_map_slice(prices.panels(), log_returns, force_sequential)?;
    Ok(ReturnPanel::new(series)?)
}

#[inline]
fn check_positive(panel: &PricePanel, bar: &OhlcvBar, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(QuantError::Domain(DomainError::NonPositivePrice {
            ticker: panel.ticker().to_string(),
            date: bar.date,
            value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn panel(ticker: &str, closes: &[f64]) -> PricePanel {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar::new(d(i as u32 + 1), c, c * 1.01, c * 0.99, c, 1_000))
            .collect();
        PricePanel::new(ticker, bars).unwrap()
    }

    #[test]
    fn test_first_row_is_zero() {
        let series = log_returns(&panel("ACME", &[100.0, 101.0, 99.0])).unwrap();
        assert_eq!(series.rows()[0], LogReturns::ZERO);
    }

    #[test]
    fn test_single_row_is_all_zero() {
        let series = log_returns(&panel("ACME", &[42.0])).unwrap();
        assert_eq!(series.rows(), &[LogReturns::ZERO]);
    }

    #[test]
    fn test_close_returns_match_known_values() {
        let series = log_returns(&panel("ACME", &[100.0, 110.0, 90.0, 90.0])).unwrap();
        let lrc = series.closes();
        assert_eq!(lrc[0], 0.0);
        assert!((lrc[1] - (110.0f64 / 100.0).ln()).abs() < 1e-12);
        assert!((lrc[2] - (90.0f64 / 110.0).ln()).abs() < 1e-12);
        assert_eq!(lrc[3], 0.0);
    }

    #[test]
    fn test_high_low_relative_to_previous_close() {
        let bars = vec![
            OhlcvBar::new(d(1), 10.0, 10.0, 10.0, 10.0, 0),
            OhlcvBar::new(d(2), 10.0, 12.0, 9.0, 11.0, 0),
        ];
        let series = log_returns(&PricePanel::new("X", bars).unwrap()).unwrap();
        let row = series.rows()[1];
        assert!((row.high - 1.2f64.ln()).abs() < 1e-12);
        assert!((row.low - 0.9f64.ln()).abs() < 1e-12);
        assert!((row.close - 1.1f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_same_date_index() {
        let p = panel("ACME", &[1.0, 2.0, 3.0]);
        let series = log_returns(&p).unwrap();
        assert_eq!(series.dates(), p.dates().as_slice());
    }

    #[test]
    fn test_non_positive_close_is_domain_error() {
        let err = log_returns(&panel("ACME", &[100.0, 0.0, 90.0])).unwrap_err();
        assert_eq!(
            err,
            QuantError::Domain(DomainError::NonPositivePrice {
                ticker: "ACME".into(),
                date: d(2),
                value: 0.0,
            })
        );
    }

    #[test]
    fn test_empty_panel_is_input_error() {
        let err = log_returns(&PricePanel::new("ACME", vec![]).unwrap()).unwrap_err();
        assert!(matches!(err, QuantError::Input(InputError::EmptySeries(_))));
    }

    #[test]
    fn test_return_panel_keeps_order() {
        let multi =
            MultiPanel::from_panels(vec![panel("B", &[1.0, 2.0]), panel("A", &[3.0, 4.0])]).unwrap();
        let returns = return_panel(&multi, true).unwrap();
        assert_eq!(returns.tickers(), vec!["B", "A"]);
    }
}
