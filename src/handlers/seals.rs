use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::middleware::{ApiJson, RequireKeyAuth};
use crate::service::seals::{
    SealLabels, aggregate, classify_detections, detection_summary, pad_bbox, propose_regions,
    select_best,
};
use crate::types::{BBox, DetectionSummary, SealDetection, SealSummary};
use crate::{VerifierError, router::VerifierState};

#[derive(Debug, Deserialize)]
pub struct CandidatesRequest {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<SealDetection>,
}

#[derive(Debug, Serialize)]
pub struct SealRegion {
    pub detection: SealDetection,
    /// Padded box to crop for classification.
    pub crop: BBox,
}

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub fallback: bool,
    pub regions: Vec<SealRegion>,
}

/// Best detector hits, or positional guesses when the detector found nothing.
pub async fn candidates_handler(
    State(state): State<VerifierState>,
    _auth: RequireKeyAuth,
    ApiJson(req): ApiJson<CandidatesRequest>,
) -> Result<Json<CandidatesResponse>, VerifierError> {
    if req.width == 0 || req.height == 0 {
        return Err(VerifierError::BadRequest(
            "image width and height must be positive".to_string(),
        ));
    }
    let cfg = &state.settings.seals;
    let fallback = req.detections.is_empty();
    let selected = if fallback {
        propose_regions(req.width, req.height)
    } else {
        select_best(req.detections, cfg.overlap_threshold, cfg.max_seals)
    };
    let regions = selected
        .into_iter()
        .map(|detection| SealRegion {
            crop: pad_bbox(&detection.bbox, cfg.padding, req.width, req.height),
            detection,
        })
        .collect();
    Ok(Json(CandidatesResponse { fallback, regions }))
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub detections: Vec<SealDetection>,
    /// Overrides the configured class labels.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub detections: DetectionSummary,
    pub seals: SealSummary,
}

pub async fn summary_handler(
    State(state): State<VerifierState>,
    _auth: RequireKeyAuth,
    ApiJson(req): ApiJson<SummaryRequest>,
) -> Result<Json<SummaryResponse>, VerifierError> {
    let custom = req.labels.map(SealLabels::new);
    let labels = custom.as_ref().unwrap_or(state.labels.as_ref());
    Ok(Json(SummaryResponse {
        detections: detection_summary(&req.detections, labels),
        seals: aggregate(&classify_detections(&req.detections, labels)),
    }))
}
