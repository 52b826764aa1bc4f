//! Bearer Token Authentication
//!
//! Every discovery route requires `Authorization: Bearer <api key>` matching
//! the single key the server was started with. Requests failing the check are
//! rejected before their body is decoded.

use super::rest::{ApiErrorResponse, AppState};
use crate::error::Error;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Message returned for missing or wrong credentials
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing Bearer token";

// =============================================================================
// API Key
// =============================================================================

/// The shared secret clients must present
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Check a presented credential against this key
    pub fn verify(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

// =============================================================================
// Header Parsing
// =============================================================================

/// Extract the bearer credential from request headers
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credentials) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let credentials = credentials.trim();
    if credentials.is_empty() {
        None
    } else {
        Some(credentials)
    }
}

// =============================================================================
// Middleware
// =============================================================================

/// Reject requests without the configured bearer token
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = bearer_token(request.headers())
        .map(|token| state.api_key.verify(token))
        .unwrap_or(false);

    if !authorized {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request with invalid or missing bearer token"
        );
        state.metrics.unauthorized.inc();
        return unauthorized();
    }

    next.run(request).await
}

fn unauthorized() -> Response {
    let err = Error::ApiAuthentication;
    (
        StatusCode::UNAUTHORIZED,
        [("WWW-Authenticate", "Bearer")],
        Json(ApiErrorResponse {
            error: err.code().into(),
            message: UNAUTHORIZED_MESSAGE.into(),
            details: None,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer secret")), Some("secret"));
        assert_eq!(bearer_token(&headers("bearer secret")), Some("secret"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_api_key_verify() {
        let key = ApiKey::new("your_secret_key");
        assert!(key.verify("your_secret_key"));
        assert!(!key.verify("your_secret_kez"));
        assert!(!key.verify("your_secret"));
        assert!(!key.verify(""));
        assert!(!key.verify("your_secret_key_and_more"));
        assert!(!ApiKey::new("").verify("anything"));
    }

    #[test]
    fn test_api_key_redacted() {
        let key = ApiKey::new("hunter2");
        assert!(!format!("{:?}", key).contains("hunter2"));
    }
}
