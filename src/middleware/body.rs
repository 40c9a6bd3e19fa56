use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::error::VerifierError;

fn rejected(status: StatusCode, text: String) -> VerifierError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        VerifierError::PayloadTooLarge
    } else if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
        VerifierError::UnsupportedMediaType(text)
    } else {
        VerifierError::BadRequest(text)
    }
}

/// `Json<T>` whose rejections use the service error body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = VerifierError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection.status(), rejection.body_text())),
        }
    }
}

/// Raw UTF-8 request body, e.g. an uploaded CSV.
pub struct ApiText(pub String);

impl<S> FromRequest<S> for ApiText
where
    S: Send + Sync,
{
    type Rejection = VerifierError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| VerifierError::BadRequest("request body is not valid UTF-8".to_string()))?;
        Ok(Self(text))
    }
}
