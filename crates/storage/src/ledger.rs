//! Append-only ledger of insider buys, keyed by accession number.
//!
//! A file-backed ledger loads existing rows on open and appends each new
//! record as it arrives. The header is written only when the file is new, so
//! repeated runs extend the same CSV.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::{AccessionId, InsiderBuyRecord, InsiderTypes, Shares, Ticker};

use crate::InsiderBuyProvider;
use crate::error::{Result, StorageError};

/// Flat CSV row.
#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    accession_number: String,
    ticker: Ticker,
    trade_date: NaiveDate,
    filing_date: NaiveDate,
    insider_types: String,
    shares: u64,
    price_per_share: f64,
    cost_of_trade: i64,
}

impl From<&InsiderBuyRecord> for LedgerRow {
    fn from(r: &InsiderBuyRecord) -> Self {
        Self {
            accession_number: r.accession.to_string(),
            ticker: r.ticker.clone(),
            trade_date: r.trade_date,
            filing_date: r.filing_date,
            insider_types: r.insider_types.to_joined(),
            shares: r.shares.raw(),
            price_per_share: r.price_per_share,
            cost_of_trade: r.cost_of_trade(),
        }
    }
}

impl TryFrom<LedgerRow> for InsiderBuyRecord {
    type Error = types::TypesError;

    fn try_from(row: LedgerRow) -> types::Result<Self> {
        InsiderBuyRecord::new(
            row.accession_number.as_str(),
            row.ticker,
            row.trade_date,
            row.filing_date,
            InsiderTypes::parse_joined(&row.insider_types)?,
            Shares(row.shares),
            row.price_per_share,
        )
    }
}

/// Insider-buy records with accession-number deduplication.
#[derive(Debug, Default)]
pub struct InsiderBuyLedger {
    records: Vec<InsiderBuyRecord>,
    seen: HashSet<AccessionId>,
    path: Option<PathBuf>,
}

impl InsiderBuyLedger {
    /// In-memory ledger with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger backed by `path`, loading any rows already there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut ledger = Self::new();
        if path.exists() {
            for record in read_ledger(&path)? {
                ledger.insert(record);
            }
        }
        info!(path = %path.display(), records = ledger.len(), "opened insider-buy ledger");
        ledger.path = Some(path);
        Ok(ledger)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn records(&self) -> &[InsiderBuyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, accession: &AccessionId) -> bool {
        self.seen.contains(accession)
    }

    /// Add a record. Returns `false` without touching anything if its
    /// accession number is already present.
    pub fn append(&mut self, record: InsiderBuyRecord) -> Result<bool> {
        record.validate()?;
        if self.contains(&record.accession) {
            debug!(accession = %record.accession, "duplicate accession ignored");
            return Ok(false);
        }
        if let Some(path) = &self.path {
            append_rows(path, std::slice::from_ref(&record))?;
        }
        self.insert(record);
        Ok(true)
    }

    /// Append several records, returning how many were new.
    pub fn extend(&mut self, records: impl IntoIterator<Item = InsiderBuyRecord>) -> Result<usize> {
        let mut added = 0;
        for record in records {
            if self.append(record)? {
                added += 1;
            }
        }
        Ok(added)
    }

    fn insert(&mut self, record: InsiderBuyRecord) -> bool {
        if !self.seen.insert(record.accession.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }
}

impl InsiderBuyProvider for InsiderBuyLedger {
    fn insider_buys(&self) -> Result<Vec<InsiderBuyRecord>> {
        Ok(self.records.clone())
    }
}

/// Read all ledger rows from `path`.
pub fn read_ledger(path: impl AsRef<Path>) -> Result<Vec<InsiderBuyRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<LedgerRow>().enumerate() {
        let row = result?;
        let record = InsiderBuyRecord::try_from(row).map_err(|e| StorageError::Parse {
            path: path.to_path_buf(),
            row: i as u64 + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Append records to `path`, writing the header only if the file is new or empty.
pub fn append_rows(path: impl AsRef<Path>, records: &[InsiderBuyRecord]) -> Result<()> {
    let path = path.as_ref();
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StorageError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    for record in records {
        writer.serialize(LedgerRow::from(record))?;
    }
    writer.flush().map_err(|e| StorageError::io(path, e))?;
    Ok(())
}
