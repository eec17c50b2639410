//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use grantdesk_core::{AuthError, GateError};
use grantdesk_persistence::PersistenceError;

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error type for consistent error responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No token, or a token the auth service rejected.
    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    /// Authenticated, but the tier does not allow this.
    #[error("insufficient permissions: {0}")]
    InsufficientPermissions(String),

    /// Resource not found, or not visible to the requester.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed or inconsistent input.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("premature submission: {0}")]
    PrematureSubmission(String),

    #[error("deadline passed: {0}")]
    DeadlinePassed(String),

    #[error("duplicate submission: a review already exists for this assignment")]
    DuplicateSubmission,

    /// Resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("too many requests")]
    RateLimited,

    /// Internal server error. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationRequired(_) => StatusCode::UNAUTHORIZED,
            ApiError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationFailed(_)
            | ApiError::PrematureSubmission(_)
            | ApiError::DeadlinePassed(_)
            | ApiError::DuplicateSubmission => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::AuthenticationRequired(_) => "AUTHENTICATION_REQUIRED",
            ApiError::InsufficientPermissions(_) => "INSUFFICIENT_PERMISSIONS",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApiError::PrematureSubmission(_) => "PREMATURE_SUBMISSION",
            ApiError::DeadlinePassed(_) => "DEADLINE_PASSED",
            ApiError::DuplicateSubmission => "DUPLICATE_SUBMISSION",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::RateLimited => "RATE_LIMITED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { kind, id } => {
                ApiError::NotFound(format!("{} not found: {}", kind, id))
            }
            PersistenceError::AlreadyExists { kind, id } => {
                ApiError::Conflict(format!("{} already exists: {}", kind, id))
            }
            PersistenceError::InvalidId(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::AccessDenied(msg) => ApiError::InsufficientPermissions(msg),
            GateError::NotFound(msg) => ApiError::NotFound(msg),
            GateError::PrematureSubmission(msg) => ApiError::PrematureSubmission(msg),
            GateError::DeadlinePassed(msg) => ApiError::DeadlinePassed(msg),
            GateError::DuplicateSubmission => ApiError::DuplicateSubmission,
            GateError::ValidationFailed(msg) => ApiError::ValidationFailed(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => ApiError::AuthenticationRequired("invalid token".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::AuthenticationRequired("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InsufficientPermissions("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::PrematureSubmission("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DeadlinePassed("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::DuplicateSubmission.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_gate_error_mapping() {
        assert!(matches!(
            ApiError::from(GateError::AccessDenied("r".into())),
            ApiError::InsufficientPermissions(_)
        ));
        assert!(matches!(
            ApiError::from(GateError::DuplicateSubmission),
            ApiError::DuplicateSubmission
        ));
    }

    #[test]
    fn test_persistence_error_mapping() {
        let err = ApiError::from(PersistenceError::NotFound {
            kind: "call".into(),
            id: "call-1".into(),
        });
        assert_eq!(err.to_string(), "not found: call not found: call-1");

        let err = ApiError::from(PersistenceError::InvalidId("bad id".into()));
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("disk on fire at /var/lib".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal server error");
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }
}
