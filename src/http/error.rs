//! API error types and HTTP response mapping.
//!
//! Every failure maps to the uniform envelope
//! `{error: true, status_code, message, path, details?}`; `details` is
//! present only for request-validation failures. Each error is logged
//! server-side before being translated into a response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::http::auth::AuthError;
use crate::task::services::TaskLifecycleError;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// A single field-level validation violation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    /// Offending request field.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// HTTP API error carrying everything the envelope needs.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    path: String,
    details: Option<Vec<FieldViolation>>,
}

/// JSON error envelope body.
#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: bool,
    status_code: u16,
    message: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldViolation]>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            path: path.into(),
            details: None,
        }
    }

    /// Absent or malformed credential.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message, path)
    }

    /// Credential present but wrong.
    #[must_use]
    pub fn forbidden(path: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Invalid API key", path)
    }

    /// Server is missing required configuration.
    #[must_use]
    pub fn misconfigured(path: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "API key is not configured",
            path,
        )
    }

    /// No task exists for the requested identifier.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Task not found", path)
    }

    /// Malformed request body, with field-level detail.
    #[must_use]
    pub fn validation(path: impl Into<String>, details: Vec<FieldViolation>) -> Self {
        let mut err = Self::new(
            StatusCode::BAD_REQUEST,
            "Request validation failed",
            path,
        );
        err.details = Some(details);
        err
    }

    /// Anything else, including downstream store or publisher failures.
    #[must_use]
    pub fn internal(path: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            path,
        )
    }

    /// Maps an auth gate failure to its response class.
    #[must_use]
    pub fn from_auth(err: &AuthError, path: impl Into<String>) -> Self {
        match err {
            AuthError::MissingHeader | AuthError::MalformedHeader => {
                Self::unauthenticated(err.to_string(), path)
            }
            AuthError::MissingSecret => Self::misconfigured(path),
            AuthError::InvalidToken => Self::forbidden(path),
        }
    }

    /// Maps a service failure to its response class.
    #[must_use]
    pub fn from_service(err: &TaskLifecycleError, path: impl Into<String>) -> Self {
        match err {
            TaskLifecycleError::NotFound(_) => Self::not_found(path),
            TaskLifecycleError::Domain(domain_err) => Self::validation(
                path,
                vec![FieldViolation::new("status", domain_err.to_string())],
            ),
            TaskLifecycleError::Repository(_) | TaskLifecycleError::Publish(_) => {
                tracing::error!(error = %err, "task operation failed");
                Self::internal(path)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(
            status = self.status.as_u16(),
            path = %self.path,
            message = %self.message,
            "request failed"
        );
        let body = Json(ErrorEnvelope {
            error: true,
            status_code: self.status.as_u16(),
            message: &self.message,
            path: &self.path,
            details: self.details.as_deref(),
        });
        (self.status, body).into_response()
    }
}
