//! Shared helpers for driving the router in-process.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use mockable::DefaultClock;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use taskrelay::config::UpdateIdMismatch;
use taskrelay::http::{AppState, AuthSecret, router};
use taskrelay::task::adapters::memory::{InMemoryEventPublisher, InMemoryTaskRepository};
use taskrelay::task::services::TaskLifecycleService;

/// Shared secret configured for the test application.
pub const API_KEY: &str = "test-secret";

/// Builds the default test application: secret configured, strict
/// update-id policy.
pub fn app() -> (Router, Arc<InMemoryEventPublisher>) {
    app_with(Some(API_KEY), UpdateIdMismatch::Reject)
}

/// Builds a test application with explicit secret and id-mismatch policy.
pub fn app_with(
    secret: Option<&str>,
    policy: UpdateIdMismatch,
) -> (Router, Arc<InMemoryEventPublisher>) {
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let service = Arc::new(TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&publisher),
        Arc::new(DefaultClock),
    ));
    let state = AppState::new(service, policy);
    let app = router(state, AuthSecret::new(secret.map(str::to_owned)));
    (app, publisher)
}

/// Sends a request and returns the status with the parsed JSON body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should be handled");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

/// Builds a request with an arbitrary `Authorization` header value.
pub fn request(
    method: Method,
    uri: &str,
    body: Option<&Value>,
    auth: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let result = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    result.expect("request should build")
}

/// Builds a request carrying the correct bearer token.
pub fn authed(method: Method, uri: &str, body: Option<&Value>) -> Request<Body> {
    let header_value = format!("Bearer {API_KEY}");
    request(method, uri, body, Some(&header_value))
}

/// Asserts the uniform error envelope shape.
pub fn assert_envelope(body: &Value, status: StatusCode, path: &str) {
    assert_eq!(body["error"], Value::Bool(true));
    assert_eq!(body["status_code"], Value::from(status.as_u16()));
    assert_eq!(body["path"], Value::from(path));
    assert!(body["message"].is_string());
}
