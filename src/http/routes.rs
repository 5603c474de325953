//! Request handlers and router assembly.

use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use mockable::Clock;
use serde::Deserialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::UpdateIdMismatch;
use crate::http::auth::{AuthSecret, require_bearer};
use crate::http::error::{ApiError, ApiResult, FieldViolation};
use crate::http::state::AppState;
use crate::task::{
    domain::{JsonObject, Task, TaskId, TaskStatus},
    ports::{EventPublisher, TaskRepository},
    services::TaskUpdate,
};

/// Request body for `POST /api/tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task description captured into the task input.
    pub heading: String,
}

/// Request body for `PUT /api/tasks/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// Task identifier; checked against the path id under the
    /// [`UpdateIdMismatch::Reject`] policy, discarded otherwise.
    pub task_id: String,
    /// Patch shallow-merged into the task output.
    pub update: JsonObject,
    /// Optional status to advance the task to.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// Assembles the application router.
///
/// The three task operations sit behind the bearer gate; `/health` is
/// open. Every request is traced through `tower-http`.
pub fn router<R, P, C>(state: AppState<R, P, C>, secret: AuthSecret) -> Router
where
    R: TaskRepository + 'static,
    P: EventPublisher + 'static,
    C: Clock + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/api/tasks", post(create_task::<R, P, C>))
        .route(
            "/api/tasks/{id}",
            get(get_task::<R, P, C>).put(update_task::<R, P, C>),
        )
        .layer(middleware::from_fn_with_state(secret, require_bearer))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe.
#[expect(
    clippy::unused_async,
    reason = "axum handlers must be async"
)]
async fn health() -> Json<&'static str> {
    Json("ok")
}

/// Creates a task and publishes its creation event.
#[expect(
    clippy::needless_pass_by_value,
    reason = "extractor signature is fixed by axum"
)]
async fn create_task<R, P, C>(
    State(state): State<AppState<R, P, C>>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>>
where
    R: TaskRepository + 'static,
    P: EventPublisher + 'static,
    C: Clock + Send + Sync + 'static,
{
    let path = uri.path();
    let Json(request) = body.map_err(|rejection| reject_body(path, &rejection))?;

    let mut input = JsonObject::new();
    input.insert("heading".to_owned(), Value::String(request.heading));

    let task = state
        .tasks
        .create(input)
        .await
        .map_err(|err| ApiError::from_service(&err, path))?;
    Ok(Json(task))
}

/// Fetches a task by identifier.
#[expect(
    clippy::needless_pass_by_value,
    reason = "extractor signature is fixed by axum"
)]
async fn get_task<R, P, C>(
    State(state): State<AppState<R, P, C>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>>
where
    R: TaskRepository + 'static,
    P: EventPublisher + 'static,
    C: Clock + Send + Sync + 'static,
{
    let path = uri.path();
    let task_id = parse_task_id(&id, path)?;
    let task = state
        .tasks
        .get(task_id)
        .await
        .map_err(|err| ApiError::from_service(&err, path))?;
    Ok(Json(task))
}

/// Merges an update into a task's output, optionally advancing its status.
#[expect(
    clippy::needless_pass_by_value,
    reason = "extractor signature is fixed by axum"
)]
async fn update_task<R, P, C>(
    State(state): State<AppState<R, P, C>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>>
where
    R: TaskRepository + 'static,
    P: EventPublisher + 'static,
    C: Clock + Send + Sync + 'static,
{
    let path = uri.path();
    let task_id = parse_task_id(&id, path)?;
    let Json(request) = body.map_err(|rejection| reject_body(path, &rejection))?;

    if state.update_id_mismatch == UpdateIdMismatch::Reject {
        let body_id = Uuid::parse_str(&request.task_id).ok();
        if body_id != Some(task_id.into_inner()) {
            return Err(ApiError::validation(
                path,
                vec![FieldViolation::new(
                    "task_id",
                    "does not match the task id in the request path",
                )],
            ));
        }
    }

    let mut update = TaskUpdate::merge(request.update);
    update.status = request.status;

    let task = state
        .tasks
        .update(task_id, update)
        .await
        .map_err(|err| ApiError::from_service(&err, path))?;
    Ok(Json(task))
}

/// An identifier that is not a UUID cannot name an existing task.
fn parse_task_id(raw: &str, path: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw)
        .map(TaskId::from_uuid)
        .map_err(|_| ApiError::not_found(path))
}

fn reject_body(path: &str, rejection: &JsonRejection) -> ApiError {
    ApiError::validation(
        path,
        vec![FieldViolation::new("body", rejection.body_text())],
    )
}
