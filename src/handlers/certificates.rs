use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{CertificateRecord, ImportSummary, import_csv};
use crate::middleware::{ApiJson, ApiText, RequireKeyAuth};
use crate::{VerifierError, router::VerifierState};

const DEFAULT_PAGE: i64 = 50;
const MAX_PAGE: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CertificateList {
    pub total: i64,
    pub records: Vec<CertificateRecord>,
}

#[derive(Debug, Serialize)]
pub struct UpsertResponse {
    pub id: i64,
}

pub async fn list_handler(
    State(state): State<VerifierState>,
    _auth: RequireKeyAuth,
    Query(params): Query<ListParams>,
) -> Result<Json<CertificateList>, VerifierError> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
    let offset = params.offset.unwrap_or(0).max(0);
    let store = state.store();
    Ok(Json(CertificateList {
        total: store.count().await?,
        records: store.list(limit, offset).await?,
    }))
}

pub async fn get_handler(
    State(state): State<VerifierState>,
    _auth: RequireKeyAuth,
    Path(reg_no): Path<String>,
) -> Result<Json<CertificateRecord>, VerifierError> {
    match state.store().get_by_reg_no(&reg_no).await? {
        Some(record) => Ok(Json(record)),
        None => Err(VerifierError::NotFound(reg_no)),
    }
}

pub async fn upsert_handler(
    State(state): State<VerifierState>,
    _auth: RequireKeyAuth,
    ApiJson(record): ApiJson<CertificateRecord>,
) -> Result<Json<UpsertResponse>, VerifierError> {
    let id = state.store().upsert(&record).await?;
    info!(id, reg_no = %record.reg_no, "certificate upserted");
    Ok(Json(UpsertResponse { id }))
}

pub async fn delete_handler(
    State(state): State<VerifierState>,
    _auth: RequireKeyAuth,
    Path(reg_no): Path<String>,
) -> Result<StatusCode, VerifierError> {
    if state.store().delete(&reg_no).await? {
        info!(reg_no = %reg_no, "certificate deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(VerifierError::NotFound(reg_no))
    }
}

/// Bulk import of a roster or table CSV sent as the raw request body.
pub async fn import_handler(
    State(state): State<VerifierState>,
    _auth: RequireKeyAuth,
    ApiText(csv_text): ApiText,
) -> Result<Json<ImportSummary>, VerifierError> {
    let summary = import_csv(state.store(), csv_text.as_bytes(), &state.settings.roster).await?;
    Ok(Json(summary))
}
