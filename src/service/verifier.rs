use crate::config::{FieldWeights, ScoringConfig};
use crate::db::{CertificateRecord, CertificateStore};
use crate::error::VerifierError;
use crate::service::extractor::{clean_text, extract_fields, extract_registration_numbers};
use crate::service::matcher::{field_score, year_score};
use crate::types::{Decision, ExtractedFields, FieldScores, OcrResult, VerificationResult};
use tracing::{debug, info};

/// Matches OCR output against the certificate store and scores it.
#[derive(Clone)]
pub struct Verifier {
    store: CertificateStore,
    scoring: ScoringConfig,
}

impl Verifier {
    pub fn new(store: CertificateStore, scoring: ScoringConfig) -> Self {
        Self { store, scoring }
    }

    pub fn store(&self) -> &CertificateStore {
        &self.store
    }

    pub async fn verify(
        &self,
        ocr: &OcrResult,
        filename: Option<&str>,
    ) -> Result<VerificationResult, VerifierError> {
        let mut result = VerificationResult {
            decision: Decision::NotFound,
            final_score: 0.0,
            registration_no: None,
            db_record: None,
            ocr_extracted: ExtractedFields::default(),
            field_scores: None,
            reasons: Vec::new(),
            confidence: ocr.confidence,
            filename: filename.map(str::to_string),
        };

        if !ocr.success {
            let err = ocr.error.as_deref().unwrap_or("unknown error");
            result.reasons.push(format!("OCR failed: {err}"));
            return Ok(result);
        }

        let text = clean_text(&ocr.extracted_text);
        result.ocr_extracted = extract_fields(&text);
        let candidates = extract_registration_numbers(&text);

        let Some(first) = candidates.first() else {
            result
                .reasons
                .push("No registration number found in OCR text".to_string());
            return Ok(result);
        };

        let mut matched = None;
        for candidate in &candidates {
            if let Some(record) = self.store.lookup(candidate).await? {
                matched = Some((candidate.clone(), record));
                break;
            }
        }

        let Some((reg_no, record)) = matched else {
            info!(candidates = ?candidates, "no certificate record for extracted registration numbers");
            result.registration_no = Some(first.clone());
            result.reasons.push(format!(
                "Registration number {first} not found in database"
            ));
            return Ok(result);
        };

        let scores = score_fields(&record, &result.ocr_extracted);
        let weighted = weighted_score(&scores, &self.scoring.weights);
        let final_score = if ocr.confidence < self.scoring.confidence_floor {
            result.reasons.push(format!(
                "Low OCR confidence ({:.0}%) reduces the score",
                ocr.confidence * 100.0
            ));
            weighted * ocr.confidence.max(0.0)
        } else {
            weighted
        };

        result.decision = decide(final_score, &self.scoring);
        result.final_score = final_score;
        result.registration_no = Some(reg_no.clone());
        result.reasons.insert(
            0,
            format!("Registration number {reg_no} found in database"),
        );
        result
            .reasons
            .extend(field_reasons(&scores, &result.ocr_extracted));
        if result.decision == Decision::NotFound {
            result
                .reasons
                .push("Extracted fields do not match the database record".to_string());
        }
        result.field_scores = Some(scores);
        result.db_record = Some(record);

        debug!(
            reg_no = %reg_no,
            score = final_score,
            decision = %result.decision,
            "certificate scored"
        );
        Ok(result)
    }
}

pub fn score_fields(record: &CertificateRecord, fields: &ExtractedFields) -> FieldScores {
    let text = fields.raw_text.as_str();
    FieldScores {
        name: field_score(&record.name, fields.name.as_deref(), text),
        institution: field_score(&record.institution, fields.institution.as_deref(), text),
        degree: field_score(&record.degree, fields.degree.as_deref(), text),
        year: year_score(record.year, fields.year),
    }
}

pub fn weighted_score(scores: &FieldScores, weights: &FieldWeights) -> f64 {
    let w = weights.normalized();
    (scores.name * w.name
        + scores.institution * w.institution
        + scores.degree * w.degree
        + scores.year * w.year)
        .clamp(0.0, 1.0)
}

pub fn decide(score: f64, scoring: &ScoringConfig) -> Decision {
    if score >= scoring.authentic_threshold {
        Decision::Authentic
    } else if score >= scoring.suspect_threshold {
        Decision::Suspect
    } else {
        Decision::NotFound
    }
}

fn field_reasons(scores: &FieldScores, fields: &ExtractedFields) -> Vec<String> {
    let entries = [
        ("Name", scores.name, fields.name.is_some()),
        ("Institution", scores.institution, fields.institution.is_some()),
        ("Degree", scores.degree, fields.degree.is_some()),
        ("Year", scores.year, fields.year.is_some()),
    ];
    entries
        .into_iter()
        .map(|(label, score, extracted)| {
            if extracted {
                format!("{label} match: {:.0}%", score * 100.0)
            } else {
                format!("{label} not extracted; full-text match: {:.0}%", score * 100.0)
            }
        })
        .collect()
}
