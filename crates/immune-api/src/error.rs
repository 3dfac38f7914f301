//! # Application Error
//!
//! Maps the submission endpoint's rejection categories to HTTP responses:
//! `400` for schema/canonicalization failures, `403` for signature/ruleset
//! failures, `503` when the transport or quarantine publisher itself
//! reports non-acceptance.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Schema or canonicalization failure — rejection `reason` contains
    /// neither `signature` nor `ruleset`.
    #[error("{0}")]
    BadRequest(String),

    /// Signature or ruleset failure.
    #[error("{0}")]
    Forbidden(String),

    /// The transport or quarantine publisher reported non-acceptance.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// A construction-time or otherwise unexpected failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classify a rejection `reason` string into the `400`/`403` split:
    /// `403` when the reason mentions `signature` or `ruleset`, `400`
    /// otherwise.
    pub fn from_rejection_reason(reason: String) -> Self {
        if reason.contains("signature") || reason.contains("ruleset") {
            AppError::Forbidden(reason)
        } else {
            AppError::BadRequest(reason)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_reason_maps_to_forbidden() {
        let error = AppError::from_rejection_reason("signature verification failed".to_string());
        assert!(matches!(error, AppError::Forbidden(_)));
    }

    #[test]
    fn ruleset_reason_maps_to_forbidden() {
        let error = AppError::from_rejection_reason("ruleset validation failed: blocked event type".to_string());
        assert!(matches!(error, AppError::Forbidden(_)));
    }

    #[test]
    fn schema_reason_maps_to_bad_request() {
        let error = AppError::from_rejection_reason("schema validation failed: missing header.type".to_string());
        assert!(matches!(error, AppError::BadRequest(_)));
    }

    #[test]
    fn canonicalization_reason_maps_to_bad_request() {
        let error = AppError::from_rejection_reason("canonicalization failed: CANON_INVALID_NUMBER".to_string());
        assert!(matches!(error, AppError::BadRequest(_)));
    }
}
