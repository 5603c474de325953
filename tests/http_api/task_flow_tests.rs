//! Create, fetch, and update semantics plus the error envelope shape.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use super::helpers::{app, app_with, assert_envelope, authed, send};
use taskrelay::config::UpdateIdMismatch;

#[tokio::test(flavor = "multi_thread")]
async fn create_returns_a_todo_task_with_null_output() {
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
    assert_eq!(body["input"], json!({"heading": "buy milk"}));
    assert_eq!(body["output"], Value::Null);
    assert!(body["created_at"].is_string());
    let id = body["id"].as_str().expect("id should be a string");
    assert!(!id.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn create_publishes_the_created_task() {
    let (app, publisher) = app();

    let (_status, body) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;

    let published = publisher.published().expect("publisher state readable");
    assert_eq!(published.len(), 1);
    let event = published.first().expect("one published event");
    assert_eq!(event["id"], body["id"]);
    assert_eq!(event["input"], json!({"heading": "buy milk"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_round_trips_through_fetch_idempotently() {
    let (app, _publisher) = app();
    let (_status, created) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id should be a string");
    let uri = format!("/api/tasks/{id}");

    let (first_status, first) = send(&app, authed(Method::GET, &uri, None)).await;
    let (second_status, second) = send(&app, authed(Method::GET, &uri, None)).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, created);
    assert_eq!(second, first);
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_unknown_id_yields_404() {
    let (app, _publisher) = app();
    let uri = "/api/tasks/2f1aabf4-9c1c-4f3a-a1d4-6a9f52ac1111";

    let (status, body) = send(&app, authed(Method::GET, uri, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&body, StatusCode::NOT_FOUND, uri);
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_non_uuid_id_yields_404() {
    let (app, _publisher) = app();

    let (status, body) = send(&app, authed(Method::GET, "/api/tasks/not-a-uuid", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&body, StatusCode::NOT_FOUND, "/api/tasks/not-a-uuid");
}

#[tokio::test(flavor = "multi_thread")]
async fn update_unknown_id_yields_404() {
    let (app, _publisher) = app();
    let id = "2f1aabf4-9c1c-4f3a-a1d4-6a9f52ac1111";
    let uri = format!("/api/tasks/{id}");

    let (status, body) = send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({"task_id": id, "update": {"result": "done"}})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&body, StatusCode::NOT_FOUND, &uri);
}

#[tokio::test(flavor = "multi_thread")]
async fn updates_merge_shallowly_with_patch_keys_winning() {
    let (app, _publisher) = app();
    let (_status, created) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id should be a string");
    let uri = format!("/api/tasks/{id}");

    let (first_status, first) = send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({"task_id": id, "update": {"result": "done"}})),
        ),
    )
    .await;
    let (second_status, second) = send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({"task_id": id, "update": {"note": "ok"}})),
        ),
    )
    .await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(first["output"], json!({"result": "done"}));
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(second["output"], json!({"result": "done", "note": "ok"}));
    // Everything but the output is untouched.
    assert_eq!(second["id"], created["id"]);
    assert_eq!(second["status"], created["status"]);
    assert_eq!(second["input"], created["input"]);
    assert_eq!(second["created_at"], created["created_at"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_with_status_advances_the_task() {
    let (app, _publisher) = app();
    let (_status, created) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id should be a string");
    let uri = format!("/api/tasks/{id}");

    let (status, body) = send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({"task_id": id, "update": {}, "status": "IN_PROGRESS"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("IN_PROGRESS"));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_status_transition_yields_validation_failure() {
    let (app, _publisher) = app();
    let (_status, created) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id should be a string");
    let uri = format!("/api/tasks/{id}");
    send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({"task_id": id, "update": {}, "status": "DONE"})),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({"task_id": id, "update": {}, "status": "IN_PROGRESS"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&body, StatusCode::BAD_REQUEST, &uri);
    let details = body["details"].as_array().expect("details should be a list");
    assert_eq!(details.first().map(|d| &d["field"]), Some(&json!("status")));
}

#[tokio::test(flavor = "multi_thread")]
async fn mismatched_body_id_is_rejected_under_the_strict_policy() {
    let (app, _publisher) = app();
    let (_status, created) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id should be a string");
    let uri = format!("/api/tasks/{id}");

    let (status, body) = send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({
                "task_id": "2f1aabf4-9c1c-4f3a-a1d4-6a9f52ac1111",
                "update": {"result": "done"}
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&body, StatusCode::BAD_REQUEST, &uri);
    let details = body["details"].as_array().expect("details should be a list");
    assert_eq!(details.first().map(|d| &d["field"]), Some(&json!("task_id")));
}

#[tokio::test(flavor = "multi_thread")]
async fn mismatched_body_id_is_discarded_under_the_ignore_policy() {
    let (app, _publisher) = app_with(Some(super::helpers::API_KEY), UpdateIdMismatch::Ignore);
    let (_status, created) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id should be a string");
    let uri = format!("/api/tasks/{id}");

    let (status, body) = send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({
                "task_id": "2f1aabf4-9c1c-4f3a-a1d4-6a9f52ac1111",
                "update": {"result": "done"}
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], json!({"result": "done"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_create_body_yields_validation_details() {
    let (app, _publisher) = app();

    let (status, body) = send(
        &app,
        authed(Method::POST, "/api/tasks", Some(&json!({"title": "nope"}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&body, StatusCode::BAD_REQUEST, "/api/tasks");
    let details = body["details"].as_array().expect("details should be a list");
    assert!(!details.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn non_object_update_field_yields_validation_details() {
    let (app, _publisher) = app();
    let (_status, created) = send(
        &app,
        authed(
            Method::POST,
            "/api/tasks",
            Some(&json!({"heading": "buy milk"})),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id should be a string");
    let uri = format!("/api/tasks/{id}");

    let (status, body) = send(
        &app,
        authed(
            Method::PUT,
            &uri,
            Some(&json!({"task_id": id, "update": "not-an-object"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&body, StatusCode::BAD_REQUEST, &uri);
    assert!(body["details"].is_array());
}
