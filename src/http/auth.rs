//! Static bearer-token auth gate.
//!
//! Every protected request re-validates the `Authorization` header
//! against the single configured secret; there is no session state and
//! no per-client key. A server with no secret configured fails requests
//! with a misconfiguration error rather than refusing to boot.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::error::ApiError;

/// Shared-secret bearer token handed to the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthSecret(Option<String>);

impl AuthSecret {
    /// Wraps the configured secret, if any.
    #[must_use]
    pub const fn new(secret: Option<String>) -> Self {
        Self(secret)
    }
}

/// Failures raised by the auth gate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header was supplied.
    #[error("Missing Authorization header")]
    MissingHeader,

    /// The header is not of the form `Bearer <token>`.
    #[error("Invalid Authorization header format. Expected 'Bearer <token>'")]
    MalformedHeader,

    /// The server has no secret configured.
    #[error("API key is not configured")]
    MissingSecret,

    /// The supplied token does not match the secret.
    #[error("Invalid API key")]
    InvalidToken,
}

/// Validates an `Authorization` header value against the secret.
///
/// The scheme comparison is case-insensitive; the header must consist of
/// exactly two whitespace-separated parts.
///
/// # Errors
///
/// Returns the [`AuthError`] describing why validation failed.
pub fn validate_bearer(header: Option<&str>, secret: Option<&str>) -> Result<(), AuthError> {
    let raw = header.ok_or(AuthError::MissingHeader)?;

    let mut parts = raw.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MalformedHeader)?;
    let token = parts.next().ok_or(AuthError::MalformedHeader)?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let expected = secret.ok_or(AuthError::MissingSecret)?;
    if token != expected {
        return Err(AuthError::InvalidToken);
    }
    Ok(())
}

/// Axum middleware enforcing the bearer gate on protected routes.
#[expect(
    clippy::needless_pass_by_value,
    reason = "extractor signature is fixed by axum"
)]
pub async fn require_bearer(
    State(secret): State<AuthSecret>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match validate_bearer(header, secret.0.as_deref()) {
        Ok(()) => next.run(request).await,
        Err(err) => ApiError::from_auth(&err, request.uri().path()).into_response(),
    }
}
