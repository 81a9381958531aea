//! Form 4 filing references from the SEC submissions document.
//!
//! `https://data.sec.gov/submissions/CIK##########.json` carries the recent
//! filings as parallel arrays under `filings.recent`. Only the columns needed
//! to locate a Form 4 are read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use types::{AccessionId, Cik, Ticker};

use crate::error::{FilingError, Result};

const ARCHIVE_BASE: &str = "https://www.sec.gov/Archives/edgar/data";

#[derive(Debug, Deserialize)]
struct Submissions {
    filings: Filings,
}

#[derive(Debug, Deserialize)]
struct Filings {
    recent: RecentFilings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    accession_number: Vec<String>,
    filing_date: Vec<String>,
    report_date: Vec<String>,
    form: Vec<String>,
    primary_document: Vec<String>,
}

/// Location of one Form 4 filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRef {
    pub accession: AccessionId,
    pub ticker: Ticker,
    pub cik: Cik,
    /// Period of report, i.e. the trade date.
    pub trade_date: NaiveDate,
    pub filing_date: NaiveDate,
    /// Primary document name, e.g. `xslF345X05/wk-form4_1700000000.xml`.
    pub primary_document: String,
}

impl FilingRef {
    fn folder(&self) -> String {
        format!(
            "{ARCHIVE_BASE}/{}/{}",
            self.cik.unpadded(),
            self.accession.compact()
        )
    }

    /// URL of the primary (XML) document.
    pub fn xml_url(&self) -> String {
        format!("{}/{}", self.folder(), self.primary_document)
    }

    /// URL of the full submission text file.
    pub fn txt_url(&self) -> String {
        format!("{}/{}.txt", self.folder(), self.accession)
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| FilingError::Malformed(format!("{field} {value:?}: {e}")))
}

/// Form 4 filings in a submissions document filed after `earliest`.
///
/// Entries without a report date are skipped, as are all other form types.
pub fn recent_form4_filings(
    submissions_json: &str,
    ticker: &str,
    cik: &Cik,
    earliest: NaiveDate,
) -> Result<Vec<FilingRef>> {
    let doc: Submissions = serde_json::from_str(submissions_json)?;
    let recent = doc.filings.recent;

    let n = recent.accession_number.len();
    let lengths = [
        recent.filing_date.len(),
        recent.report_date.len(),
        recent.form.len(),
        recent.primary_document.len(),
    ];
    if lengths.iter().any(|&len| len != n) {
        return Err(FilingError::Malformed(format!(
            "filings.recent columns differ in length: {n} vs {lengths:?}"
        )));
    }

    let mut out = Vec::new();
    for i in 0..n {
        if recent.form[i] != "4" || recent.report_date[i].trim().is_empty() {
            continue;
        }
        let filing_date = parse_date("filingDate", &recent.filing_date[i])?;
        if filing_date <= earliest {
            continue;
        }
        out.push(FilingRef {
            accession: AccessionId(recent.accession_number[i].clone()),
            ticker: ticker.to_string(),
            cik: cik.clone(),
            trade_date: parse_date("reportDate", &recent.report_date[i])?,
            filing_date,
            primary_document: recent.primary_document[i].clone(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "cik": "320193",
        "filings": {
            "recent": {
                "accessionNumber": ["0000320193-24-000081", "0000320193-24-000070", "0001140361-24-012345", "0000320193-23-000010"],
                "filingDate": ["2024-05-03", "2024-04-01", "2024-03-15", "2023-11-20"],
                "reportDate": ["2024-05-01", "", "2024-03-13", "2023-11-17"],
                "form": ["4", "4", "10-Q", "4"],
                "primaryDocument": ["xslF345X05/wf-form4_1.xml", "x.xml", "q.htm", "xslF345X05/wf-form4_2.xml"],
                "items": ["", "", "", ""]
            }
        }
    }"#;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_selects_form4_with_report_date_after_earliest() {
        let cik = Cik::from_number(320193);
        let refs = recent_form4_filings(DOC, "AAPL", &cik, date("2024-01-01")).unwrap();
        assert_eq!(refs.len(), 1);
        let f = &refs[0];
        assert_eq!(f.accession.as_str(), "0000320193-24-000081");
        assert_eq!(f.trade_date, date("2024-05-01"));
        assert_eq!(f.filing_date, date("2024-05-03"));

        let all = recent_form4_filings(DOC, "AAPL", &cik, date("2000-01-01")).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_archive_urls() {
        let cik = Cik::from_number(320193);
        let refs = recent_form4_filings(DOC, "AAPL", &cik, date("2024-01-01")).unwrap();
        assert_eq!(
            refs[0].xml_url(),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019324000081/xslF345X05/wf-form4_1.xml"
        );
        assert_eq!(
            refs[0].txt_url(),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019324000081/0000320193-24-000081.txt"
        );
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let doc = r#"{"filings": {"recent": {
            "accessionNumber": ["a", "b"], "filingDate": ["2024-01-01"],
            "reportDate": ["", ""], "form": ["4", "4"], "primaryDocument": ["x", "y"]}}}"#;
        let err = recent_form4_filings(doc, "X", &Cik::from_number(1), date("2000-01-01"));
        assert!(matches!(err, Err(FilingError::Malformed(_))));
    }
}
