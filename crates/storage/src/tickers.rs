//! Ticker list files: one symbol per row, no header.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;
use types::Ticker;

use crate::error::{Result, StorageError};

/// Read every non-empty cell of every row, trimmed, in file order.
pub fn read_tickers(path: impl AsRef<Path>) -> Result<Vec<Ticker>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut tickers = Vec::new();
    for record in reader.records() {
        let record = record?;
        tickers.extend(
            record
                .iter()
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(String::from),
        );
    }
    debug!(path = %path.display(), count = tickers.len(), "read ticker list");
    Ok(tickers)
}

/// Write one symbol per row.
pub fn write_tickers<S: AsRef<str>>(path: impl AsRef<Path>, tickers: &[S]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    for t in tickers {
        writer.write_record([t.as_ref()])?;
    }
    writer.flush().map_err(|e| StorageError::io(path, e))?;
    Ok(())
}
