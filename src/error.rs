use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum VerifierError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Certificate not found: {0}")]
    NotFound(String),

    #[error("Missing or invalid API key")]
    Unauthorized,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

impl IntoResponse for VerifierError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            VerifierError::DatabaseError(_) | VerifierError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
            VerifierError::Csv(e) => (StatusCode::BAD_REQUEST, "INVALID_CSV", e.to_string()),
            VerifierError::Json(e) => (StatusCode::BAD_REQUEST, "INVALID_JSON", e.to_string()),
            VerifierError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            VerifierError::NotFound(reg_no) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("No certificate with registration number {reg_no}."),
            ),
            VerifierError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or missing key.".to_string(),
            ),
            VerifierError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "Request body too large.".to_string(),
            ),
            VerifierError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg,
            ),
        };
        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
