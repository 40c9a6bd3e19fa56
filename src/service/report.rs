use crate::types::{CombinedVerdict, Decision, VerificationResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub decision: Decision,
    pub confidence_score: f64,
    pub registration_number: Option<String>,
    pub database_match: bool,
}

/// Downloadable record of one verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationReport {
    pub timestamp: String,
    pub verification_result: VerificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_verdict: Option<CombinedVerdict>,
    pub summary: ReportSummary,
}

impl VerificationReport {
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn build_report(
    result: &VerificationResult,
    verdict: Option<&CombinedVerdict>,
    at: DateTime<Local>,
) -> VerificationReport {
    VerificationReport {
        timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        summary: ReportSummary {
            decision: result.decision,
            confidence_score: result.final_score,
            registration_number: result.registration_no.clone(),
            database_match: result.db_record.is_some(),
        },
        verification_result: result.clone(),
        combined_verdict: verdict.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractedFields;
    use chrono::TimeZone;

    #[test]
    fn report_summarises_the_result() {
        let result = VerificationResult {
            decision: Decision::Suspect,
            final_score: 0.62,
            registration_no: Some("UNI10009".to_string()),
            db_record: None,
            ocr_extracted: ExtractedFields::default(),
            field_scores: None,
            reasons: vec!["Name match: 40%".to_string()],
            confidence: 0.85,
            filename: Some("rajeev.png".to_string()),
        };
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let report = build_report(&result, None, at);
        assert_eq!(report.timestamp, "2024-03-09 14:05:07");
        assert!(!report.summary.database_match);

        let json: serde_json::Value =
            serde_json::from_str(&report.to_pretty_json().unwrap()).unwrap();
        assert_eq!(json["summary"]["decision"], "SUSPECT");
        assert_eq!(json["summary"]["registration_number"], "UNI10009");
        assert!(json.get("combined_verdict").is_none());
    }
}
