//! Choosing a common analysis start date for a universe.

use chrono::Days;
use types::{MultiPanel, NaiveDate, Ticker};

/// First available session of every non-empty panel, in panel order.
pub fn first_available_dates(prices: &MultiPanel) -> Vec<(Ticker, NaiveDate)> {
    prices
        .iter()
        .filter_map(|p| p.first_date().map(|d| (p.ticker().to_string(), d)))
        .collect()
}

/// Latest first-available date plus `pad_days`, with the ticker that set it.
///
/// Every ticker has history from the returned date on (given the padding
/// stays inside the data). Returns `None` when no ticker has data or the
/// padded date overflows the calendar. On ties the first ticker wins.
pub fn common_start_date(
    first_dates: &[(Ticker, NaiveDate)],
    pad_days: u64,
) -> Option<(NaiveDate, Ticker)> {
    let (ticker, latest) = first_dates
        .iter()
        .fold(None::<&(Ticker, NaiveDate)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        })?;
    let start = latest.checked_add_days(Days::new(pad_days))?;
    Some((start, ticker.clone()))
}
