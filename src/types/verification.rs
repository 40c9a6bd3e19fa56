use crate::db::CertificateRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of matching OCR output against the certificate store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Authentic,
    Suspect,
    NotFound,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::Authentic => "AUTHENTIC",
            Decision::Suspect => "SUSPECT",
            Decision::NotFound => "NOT_FOUND",
        };
        f.write_str(s)
    }
}

/// Fields pulled out of the OCR text. Missing fields stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub year: Option<i64>,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldScores {
    pub name: f64,
    pub institution: f64,
    pub degree: f64,
    pub year: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationResult {
    pub decision: Decision,
    pub final_score: f64,
    pub registration_no: Option<String>,
    pub db_record: Option<CertificateRecord>,
    pub ocr_extracted: ExtractedFields,
    pub field_scores: Option<FieldScores>,
    pub reasons: Vec<String>,
    pub confidence: f64,
    pub filename: Option<String>,
}
