//! Integration tests for the CSV files that feed a screening run.
//!
//! Writes a ticker list, a price file and an insider-buy ledger into a
//! temporary directory and reads them back through the public API.

use std::fs;

use chrono::NaiveDate;
use storage::{
    CsvPriceStore, InsiderBuyLedger, InsiderBuyProvider, PriceProvider, StorageError,
    read_tickers, write_prices, write_tickers,
};
use tempfile::TempDir;
use types::{InsiderBuyRecord, InsiderType, MultiPanel, OhlcvBar, PricePanel, Shares};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
}

fn panel(ticker: &str, closes: &[f64]) -> PricePanel {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| OhlcvBar::new(d(i as u32 + 1), c, c + 0.5, c - 0.5, c, 10_000))
        .collect();
    PricePanel::new(ticker, bars).unwrap()
}

#[test]
fn price_store_serves_listed_tickers() {
    let dir = TempDir::new().unwrap();
    let tickers_path = dir.path().join("tickers.csv");
    let prices_path = dir.path().join("prices.csv");

    write_tickers(&tickers_path, &["AAA", "BBB"]).unwrap();
    let prices = MultiPanel::from_panels(vec![
        panel("AAA", &[10.0, 10.2, 10.1, 10.6]),
        panel("BBB", &[20.0, 19.5, 19.9, 20.4]),
        panel("CCC", &[5.0, 5.1, 5.2, 5.3]),
    ])
    .unwrap();
    write_prices(&prices_path, &prices).unwrap();

    let listed = read_tickers(&tickers_path).unwrap();
    let store = CsvPriceStore::open(&prices_path).unwrap();
    let subset = store.fetch_many(&listed, d(2), d(4)).unwrap();

    assert_eq!(subset.tickers(), vec!["AAA", "BBB"]);
    assert_eq!(subset.get("BBB").unwrap().closes(), vec![19.5, 19.9, 20.4]);
    assert!(matches!(
        store.fetch("CCC", d(10), d(20)),
        Err(StorageError::DataGap { .. })
    ));
}

#[test]
fn ledger_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("insider_buys.csv");
    let officer = [InsiderType::Officer].into_iter().collect();
    let record =
        InsiderBuyRecord::new("0000001-24-000007", "AAA", d(3), d(5), officer, Shares(200), 10.1)
            .unwrap();

    {
        let mut ledger = InsiderBuyLedger::open(&path).unwrap();
        assert!(ledger.append(record.clone()).unwrap());
    }
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("accession_number,ticker,trade_date"));

    let mut ledger = InsiderBuyLedger::open(&path).unwrap();
    assert!(!ledger.append(record.clone()).unwrap());
    assert_eq!(ledger.insider_buys().unwrap(), vec![record]);
}
