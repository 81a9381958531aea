//! Storage layer for insider-lateral
//!
//! **Philosophy:** Declarative, Modular, SoC
//! - Declarative: CSV layouts are fixed row structs, read and written via serde
//! - Modular: analytics consume data through [`PriceProvider`] and
//!   [`InsiderBuyProvider`], so a network-backed source can replace the files
//! - SoC: This crate ONLY handles persistence, no analytics
//!
//! **Files:**
//! - Prices: long-format OHLCV (`ticker,date,open,high,low,close,volume`)
//! - Ticker lists: one symbol per row
//! - Insider buys: append-only ledger deduplicated by accession number

mod error;
mod ledger;
mod prices;
mod tickers;

use chrono::NaiveDate;
use types::{InsiderBuyRecord, PricePanel};

pub use error::{Result, StorageError};
pub use ledger::{InsiderBuyLedger, append_rows, read_ledger};
pub use prices::{CsvPriceStore, read_prices, write_prices};
pub use tickers::{read_tickers, write_tickers};

/// Source of daily price history.
pub trait PriceProvider {
    /// Bars for `ticker` with dates in `[from, to]`.
    ///
    /// An empty result is a [`StorageError::DataGap`], never an empty panel.
    fn fetch(&self, ticker: &str, from: NaiveDate, to: NaiveDate) -> Result<PricePanel>;
}

/// Source of insider-buy records.
pub trait InsiderBuyProvider {
    fn insider_buys(&self) -> Result<Vec<InsiderBuyRecord>>;
}
