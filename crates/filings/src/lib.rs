//! SEC EDGAR document handling.
//!
//! Parses the documents needed to find a company's Form 4 filings: the
//! ticker → CIK directory and the per-company submissions index. Fetching
//! the documents is left to the caller; this crate only reads JSON text.

mod cik;
mod error;
mod filing;

pub use cik::{CikDirectory, Company};
pub use error::{FilingError, Result};
pub use filing::{FilingRef, recent_form4_filings};
