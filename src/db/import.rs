//! CSV import for the certificate store.
//!
//! Two layouts are accepted:
//! - the institution roster export (`Serial No.`, `Father's Name`, `Son's Name`,
//!   `Assigned Date`), completed with the configured roster defaults
//! - a plain table whose headers match the `certificates` columns

use crate::config::RosterConfig;
use crate::db::models::{CertificateRecord, normalize_reg_no};
use crate::db::sqlite::CertificateStore;
use crate::error::VerifierError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use tracing::{info, warn};

const ROSTER_SERIAL_HEADER: &str = "Serial No.";
const ROSTER_DATE_FORMAT: &str = "%d %B %Y";

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Serial No.")]
    serial_no: String,
    #[serde(rename = "Father's Name")]
    father_name: Option<String>,
    #[serde(rename = "Son's Name")]
    name: String,
    #[serde(rename = "Assigned Date")]
    assigned_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    reg_no: String,
    name: String,
    institution: String,
    degree: String,
    year: i64,
    usn: Option<String>,
    father_name: Option<String>,
    assigned_date: Option<String>,
    certificate_type: Option<String>,
    notes: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub records: Vec<CertificateRecord>,
    pub skipped: usize,
}

/// Parse CSV rows into records. Rows that fail to parse are skipped and counted.
pub fn parse_csv<R: Read>(reader: R, roster: &RosterConfig) -> Result<ParsedCsv, VerifierError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let is_roster = reader
        .headers()?
        .iter()
        .any(|h| h.eq_ignore_ascii_case(ROSTER_SERIAL_HEADER));

    let mut parsed = ParsedCsv::default();
    if is_roster {
        for (index, result) in reader.deserialize::<RosterRow>().enumerate() {
            match result.map_err(VerifierError::from).and_then(|row| roster_record(row, roster)) {
                Ok(record) => parsed.records.push(record),
                Err(e) => {
                    warn!(row = index, error = %e, "skipping roster row");
                    parsed.skipped += 1;
                }
            }
        }
    } else {
        for (index, result) in reader.deserialize::<TableRow>().enumerate() {
            match result.map_err(VerifierError::from).and_then(table_record) {
                Ok(record) => parsed.records.push(record),
                Err(e) => {
                    warn!(row = index, error = %e, "skipping table row");
                    parsed.skipped += 1;
                }
            }
        }
    }
    Ok(parsed)
}

/// Parse and upsert in one transaction. A key repeated in the file is
/// stored once and counted once.
pub async fn import_csv<R: Read>(
    store: &CertificateStore,
    reader: R,
    roster: &RosterConfig,
) -> Result<ImportSummary, VerifierError> {
    let parsed = parse_csv(reader, roster)?;
    let ids = store.upsert_many(&parsed.records).await?;
    let summary = ImportSummary {
        imported: ids.iter().collect::<BTreeSet<_>>().len(),
        skipped: parsed.skipped,
    };
    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "CSV import finished"
    );
    Ok(summary)
}

fn roster_record(row: RosterRow, roster: &RosterConfig) -> Result<CertificateRecord, VerifierError> {
    let serial = normalize_reg_no(&row.serial_no);
    if serial.is_empty() || row.name.is_empty() {
        return Err(VerifierError::BadRequest(
            "roster row without serial number or name".to_string(),
        ));
    }
    let year = row
        .assigned_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, ROSTER_DATE_FORMAT).ok())
        .map(|d| i64::from(d.year()))
        .unwrap_or(roster.graduation_year);

    Ok(CertificateRecord {
        id: 0,
        reg_no: serial.clone(),
        usn: Some(serial),
        name: row.name,
        father_name: row.father_name.filter(|f| !f.is_empty()),
        institution: roster.institution.clone(),
        degree: roster.degree.clone(),
        year,
        assigned_date: row.assigned_date.filter(|d| !d.is_empty()),
        certificate_type: Some("Degree Certificate".to_string()),
        notes: Some("Imported from CSV".to_string()),
    })
}

fn table_record(row: TableRow) -> Result<CertificateRecord, VerifierError> {
    if normalize_reg_no(&row.reg_no).is_empty() {
        return Err(VerifierError::BadRequest("row without reg_no".to_string()));
    }
    Ok(CertificateRecord {
        id: 0,
        reg_no: normalize_reg_no(&row.reg_no),
        usn: row.usn,
        name: row.name,
        father_name: row.father_name,
        institution: row.institution,
        degree: row.degree,
        year: row.year,
        assigned_date: row.assigned_date,
        certificate_type: row.certificate_type,
        notes: row.notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
Serial No.,Father's Name,Son's Name,Assigned Date
1BG19CS098,RAMESH RAO,KIRAN RAO,12 August 2020
1BG19CS100,ASHOK VERMA,VIKRAM VERMA,not a date
,NOBODY,,1 August 2020
";

    #[test]
    fn roster_rows_get_defaults_and_parsed_year() {
        let parsed = parse_csv(ROSTER.as_bytes(), &RosterConfig::default()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);

        let first = &parsed.records[0];
        assert_eq!(first.reg_no, "1BG19CS098");
        assert_eq!(first.usn.as_deref(), Some("1BG19CS098"));
        assert_eq!(first.father_name.as_deref(), Some("RAMESH RAO"));
        assert_eq!(first.year, 2020);
        assert_eq!(first.institution, RosterConfig::default().institution);

        // unparseable date falls back to the graduation year
        assert_eq!(parsed.records[1].year, 2023);
    }

    #[test]
    fn table_rows_map_columns() {
        let csv = "\
reg_no,name,institution,degree,year,notes
abc2022007,Prisha Verma,Global Tech University,M.Tech AI,2022,
UNI10009,Rajeev Kumar,Northfield University,B.Sc Physics,nineteen,
";
        let parsed = parse_csv(csv.as_bytes(), &RosterConfig::default()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records[0].reg_no, "ABC2022007");
        assert!(parsed.records[0].notes.is_none());
    }

    #[tokio::test]
    async fn import_writes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("certs.db").display());
        let store = CertificateStore::connect(&url).await.unwrap();

        let summary = import_csv(&store, ROSTER.as_bytes(), &RosterConfig::default())
            .await
            .unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 1 });
        assert!(store.lookup("1bg19cs100").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn repeated_serial_is_counted_once() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("certs.db").display());
        let store = CertificateStore::connect(&url).await.unwrap();

        let csv = "\
Serial No.,Father's Name,Son's Name,Assigned Date
1BG19CS098,RAMESH RAO,KIRAN RAO,12 August 2020
1bg19cs098,RAMESH RAO,KIRAN S RAO,12 August 2020
";
        let summary = import_csv(&store, csv.as_bytes(), &RosterConfig::default())
            .await
            .unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 0 });
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.lookup("1BG19CS098").await.unwrap().unwrap().name, "KIRAN S RAO");
    }
}
