use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::config::Config;
use crate::db::CertificateStore;
use crate::handlers::{certificates, health, seals, verify};
use crate::service::Verifier;
use crate::service::seals::SealLabels;

#[derive(Clone)]
pub struct VerifierState {
    pub verifier: Verifier,
    pub api_key: Arc<str>,
    pub settings: Arc<Config>,
    pub labels: Arc<SealLabels>,
}

impl VerifierState {
    pub fn new(store: CertificateStore, api_key: Arc<str>, settings: Config) -> Self {
        Self {
            verifier: Verifier::new(store, settings.scoring.clone()),
            api_key,
            labels: Arc::new(SealLabels::new(settings.seals.labels.clone())),
            settings: Arc::new(settings),
        }
    }

    pub fn store(&self) -> &CertificateStore {
        self.verifier.store()
    }
}

pub fn verifier_router(state: VerifierState) -> Router {
    let body_limit = state.settings.basic.body_limit;
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/certificates",
            get(certificates::list_handler).put(certificates::upsert_handler),
        )
        .route("/certificates/import", post(certificates::import_handler))
        .route(
            "/certificates/{reg_no}",
            get(certificates::get_handler).delete(certificates::delete_handler),
        )
        .route("/verify", post(verify::verify_handler))
        .route("/seals/candidates", post(seals::candidates_handler))
        .route("/seals/summary", post(seals::summary_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
