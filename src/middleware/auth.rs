use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use subtle::ConstantTimeEq;

use crate::error::VerifierError;
use crate::router::VerifierState;

fn key_matches(candidate: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()))
}

/// Ensure the inbound request carries the service key.
/// Accepts either:
/// - Header: `x-api-key: ...`
/// - Header: `Authorization: Bearer ...`
/// - Query string: `?key=...`
///
/// An empty configured key rejects everything.
pub fn ensure_authorized(
    headers: &HeaderMap,
    query: Option<&str>,
    expected: &str,
) -> Result<(), VerifierError> {
    if let Some(hv) = headers.get("x-api-key").and_then(|v| v.to_str().ok())
        && key_matches(hv.trim(), expected)
    {
        return Ok(());
    }

    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        let auth = auth.trim();
        if let Some(token) = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            && key_matches(token.trim(), expected)
        {
            return Ok(());
        }
    }

    if let Some(qs) = query
        && url::form_urlencoded::parse(qs.as_bytes())
            .any(|(k, v)| k == "key" && key_matches(&v, expected))
    {
        return Ok(());
    }

    Err(VerifierError::Unauthorized)
}

#[derive(Debug, Clone, Copy)]
pub struct RequireKeyAuth;

impl FromRequestParts<VerifierState> for RequireKeyAuth {
    type Rejection = VerifierError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &VerifierState,
    ) -> Result<Self, Self::Rejection> {
        ensure_authorized(&parts.headers, parts.uri.query(), &state.api_key)?;
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn accepts_each_key_location() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("secret"));
        assert!(ensure_authorized(&headers, None, "secret").is_ok());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer secret"));
        assert!(ensure_authorized(&headers, None, "secret").is_ok());

        assert!(ensure_authorized(&HeaderMap::new(), Some("limit=5&key=secret"), "secret").is_ok());
    }

    #[test]
    fn rejects_wrong_missing_or_unconfigured_key() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("nope"));
        assert!(ensure_authorized(&headers, None, "secret").is_err());
        assert!(ensure_authorized(&HeaderMap::new(), None, "secret").is_err());
        assert!(ensure_authorized(&HeaderMap::new(), Some("key="), "").is_err());
    }
}
