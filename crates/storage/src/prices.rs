//! Long-format price CSV: one row per ticker and session.
//!
//! ```text
//! ticker,date,open,high,low,close,volume
//! AAPL,2024-01-02,187.15,188.44,183.89,185.64,82488700
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::{MultiPanel, OhlcvBar, PricePanel, Ticker};

use crate::PriceProvider;
use crate::error::{Result, StorageError};

#[derive(Debug, Serialize, Deserialize)]
struct PriceRow {
    ticker: Ticker,
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Read a long-format price file into panels.
///
/// Rows of a ticker may appear in any order; duplicated sessions are rejected.
pub fn read_prices(path: impl AsRef<Path>) -> Result<MultiPanel> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: PriceRow = result?;
        let bar = OhlcvBar::new(row.date, row.open, row.high, row.low, row.close, row.volume);
        rows.push((row.ticker.trim().to_string(), bar));
    }
    debug!(path = %path.display(), rows = rows.len(), "read price rows");

    Ok(MultiPanel::from_long(rows)?)
}

/// Write panels in long format, ticker by ticker.
pub fn write_prices(path: impl AsRef<Path>, prices: &MultiPanel) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    for panel in prices.iter() {
        for bar in panel.bars() {
            writer.serialize(PriceRow {
                ticker: panel.ticker().to_string(),
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            })?;
        }
    }
    writer.flush().map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

/// Price provider backed by a long-format CSV file loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct CsvPriceStore {
    prices: MultiPanel,
}

impl CsvPriceStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let prices = read_prices(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            tickers = prices.len(),
            "loaded price store"
        );
        Ok(Self { prices })
    }

    pub fn from_panels(prices: MultiPanel) -> Self {
        Self { prices }
    }

    /// Every panel in the store.
    pub fn universe(&self) -> &MultiPanel {
        &self.prices
    }

    /// Panels for `tickers` restricted to `[from, to]`. Any gap fails the request.
    pub fn fetch_many<S: AsRef<str>>(
        &self,
        tickers: &[S],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<MultiPanel> {
        let mut out = MultiPanel::new();
        for t in tickers {
            out.push(self.fetch(t.as_ref(), from, to)?)?;
        }
        Ok(out)
    }
}

impl PriceProvider for CsvPriceStore {
    fn fetch(&self, ticker: &str, from: NaiveDate, to: NaiveDate) -> Result<PricePanel> {
        let gap = || StorageError::DataGap {
            ticker: ticker.to_string(),
            from,
            to,
        };
        let panel = self.prices.get(ticker).ok_or_else(gap)?.between(from, to);
        if panel.is_empty() {
            return Err(gap());
        }
        Ok(panel)
    }
}
