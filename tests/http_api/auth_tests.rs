//! Bearer gate matrix and the open health probe.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::helpers::{app, app_with, assert_envelope, authed, request, send};
use taskrelay::config::UpdateIdMismatch;

const PROTECTED: &[(Method, &str)] = &[
    (Method::POST, "/api/tasks"),
    (Method::GET, "/api/tasks/00000000-0000-0000-0000-000000000000"),
    (Method::PUT, "/api/tasks/00000000-0000-0000-0000-000000000000"),
];

#[tokio::test(flavor = "multi_thread")]
async fn health_needs_no_credentials() {
    let (app, _publisher) = app();

    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_header_yields_401_on_every_protected_endpoint() {
    let (app, _publisher) = app();

    for (method, uri) in PROTECTED {
        let (status, body) = send(&app, request(method.clone(), uri, None, None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_envelope(&body, StatusCode::UNAUTHORIZED, uri);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_header_yields_401() {
    let (app, _publisher) = app();

    for auth in ["Token abc", "Bearer", "Bearer one two"] {
        let (status, body) = send(
            &app,
            request(Method::POST, "/api/tasks", None, Some(auth)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {auth:?}");
        assert_envelope(&body, StatusCode::UNAUTHORIZED, "/api/tasks");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_token_yields_403() {
    let (app, _publisher) = app();

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/tasks", None, Some("Bearer wrong")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_envelope(&body, StatusCode::FORBIDDEN, "/api/tasks");
}

#[tokio::test(flavor = "multi_thread")]
async fn bearer_scheme_is_case_insensitive() {
    let (app, _publisher) = app();

    let (status, _body) = send(
        &app,
        request(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
            Some("bearer test-secret"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_server_secret_yields_500() {
    let (app, _publisher) = app_with(None, UpdateIdMismatch::Reject);

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/tasks", None, Some("Bearer anything")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope(&body, StatusCode::INTERNAL_SERVER_ERROR, "/api/tasks");
}

#[tokio::test(flavor = "multi_thread")]
async fn correct_token_passes_the_gate() {
    let (app, _publisher) = app();

    let (status, body) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("TODO"));
}
