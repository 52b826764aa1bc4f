//! Error types for the HTTP service discovery server
//!
//! The target registry itself is total and never fails. Errors only arise at
//! the edges: configuration, request decoding, authentication and I/O.

use axum::http::StatusCode;
use thiserror::Error;

/// Unified error type for the service
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // API Errors
    // =========================================================================
    #[error("API request validation failed: {0}")]
    ApiValidation(String),

    #[error("API authentication failed")]
    ApiAuthentication,

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Metrics encoding error: {0}")]
    Metrics(#[from] prometheus::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status this error surfaces as when it reaches a client
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::ApiAuthentication => StatusCode::UNAUTHORIZED,
            Error::ApiValidation(_) | Error::JsonParse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Internal(_) | Error::Configuration(_) | Error::Metrics(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::Internal(_) => "internal_error",
            Error::Configuration(_) => "configuration_error",
            Error::ApiValidation(_) => "invalid_request",
            Error::ApiAuthentication => "unauthorized",
            Error::JsonParse(_) => "invalid_json",
            Error::Metrics(_) => "metrics_error",
            Error::Io(_) => "io_error",
        }
    }
}

/// Result type alias for the service
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(Error::ApiAuthentication.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::ApiValidation("missing targets".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::Configuration("bad address".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_client_classification() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(json_err);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "invalid_json");

        let io_err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(io_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(io_err.code(), "io_error");
    }
}
