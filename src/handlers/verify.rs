use axum::{Json, extract::State};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::middleware::{ApiJson, RequireKeyAuth};
use crate::service::demo::demo_ocr;
use crate::service::report::{VerificationReport, build_report};
use crate::service::seals::{aggregate, classify_detections, dedupe};
use crate::service::verdict::combine;
use crate::types::{CombinedVerdict, OcrResult, SealDetection, SealSummary, VerificationResult};
use crate::{VerifierError, router::VerifierState};

#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    /// Output of an OCR engine. Omit to use a demo sample.
    #[serde(default)]
    pub ocr: Option<OcrResult>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub demo: bool,
    /// Classified seal detections; presence enables the seal check.
    #[serde(default)]
    pub seals: Option<Vec<SealDetection>>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub result: VerificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seals: Option<SealSummary>,
    pub verdict: CombinedVerdict,
    pub report: VerificationReport,
}

pub async fn verify_handler(
    State(state): State<VerifierState>,
    _auth: RequireKeyAuth,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> Result<Json<VerifyResponse>, VerifierError> {
    let filename = req.filename.as_deref();
    let ocr = match req.ocr {
        Some(ocr) => ocr,
        None if req.demo || state.settings.demo_fallback() => {
            debug!(filename = ?filename, "using demo OCR sample");
            demo_ocr(filename)
        }
        None => {
            return Err(VerifierError::BadRequest(
                "no OCR result supplied; send `ocr` or set `demo`".to_string(),
            ));
        }
    };

    if !(0.0..=1.0).contains(&ocr.confidence) {
        return Err(VerifierError::BadRequest(format!(
            "OCR confidence must be between 0 and 1, got {}",
            ocr.confidence
        )));
    }

    let result = state.verifier.verify(&ocr, filename).await?;

    // Already classified: overlapping duplicates go, but every distinct seal counts.
    let seal_cfg = &state.settings.seals;
    let seals = req.seals.map(|detections| {
        let distinct = dedupe(detections, seal_cfg.overlap_threshold);
        aggregate(&classify_detections(&distinct, &state.labels))
    });

    let verdict = combine(&result, seals.as_ref(), seal_cfg);
    let report = build_report(&result, Some(&verdict), Local::now());

    info!(
        registration_no = ?result.registration_no,
        decision = %result.decision,
        score = result.final_score,
        verdict = ?verdict.verdict,
        "certificate verified"
    );

    Ok(Json(VerifyResponse {
        result,
        seals,
        verdict,
        report,
    }))
}
