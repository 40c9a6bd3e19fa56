use axum::{Json, extract::State};
use serde::Serialize;

use crate::{VerifierError, router::VerifierState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub certificates: i64,
    pub demo_mode: bool,
}

/// Liveness plus a quick look at the store. Needs no key.
pub async fn health_handler(
    State(state): State<VerifierState>,
) -> Result<Json<HealthResponse>, VerifierError> {
    let certificates = state.store().count().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        certificates,
        demo_mode: state.settings.demo_fallback(),
    }))
}
