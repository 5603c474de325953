//! Service layer for task creation, retrieval, and update.

use crate::task::{
    domain::{JsonObject, Task, TaskDomainError, TaskId, TaskStatus},
    ports::{EventPublishError, EventPublisher, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Changes applied to an existing task by the update operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Patch shallow-merged into the task output.
    pub patch: JsonObject,
    /// Optional status to advance the task to.
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    /// Creates an update that only merges `patch` into the output.
    #[must_use]
    pub const fn merge(patch: JsonObject) -> Self {
        Self {
            patch,
            status: None,
        }
    }

    /// Sets the status to advance the task to.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Event publication failed after the task row was committed.
    #[error(transparent)]
    Publish(#[from] EventPublishError),
    /// No task exists for the given identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Owns one instance of each collaborator and is handed to request
/// handlers by reference; no ambient process-global state.
#[derive(Clone)]
pub struct TaskLifecycleService<R, P, C>
where
    R: TaskRepository,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    publisher: Arc<P>,
    clock: Arc<C>,
}

impl<R, P, C> TaskLifecycleService<R, P, C>
where
    R: TaskRepository,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            publisher,
            clock,
        }
    }

    /// Creates a task from client input, persists it, and publishes the
    /// serialized record as a creation event.
    ///
    /// The publish happens after the row is committed: a broker failure
    /// surfaces as [`TaskLifecycleError::Publish`] while the row remains
    /// durable. No compensating action is taken and the event is not
    /// retried; the row is the source of truth.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when persistence or publication
    /// fails.
    pub async fn create(&self, input: JsonObject) -> TaskLifecycleResult<Task> {
        let task = Task::new(input, &*self.clock);
        self.repository.create(&task).await?;

        let event = serde_json::to_value(&task).map_err(EventPublishError::from)?;
        let message_id = self.publisher.publish(&event).await?;
        tracing::info!(task_id = %task.id(), message_id = %message_id, "published task creation event");

        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no task exists for
    /// `id`, or [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn get(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Applies an update to an existing task.
    ///
    /// The patch is shallow-merged into the task output (patch keys win,
    /// other keys are retained); an explicit status, when present, is
    /// advanced through the domain transition guard. Input and creation
    /// timestamp are never touched. Concurrent updates to the same task
    /// are last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no task exists for
    /// `id`, [`TaskLifecycleError::Domain`] for an invalid status
    /// transition, or [`TaskLifecycleError::Repository`] when persistence
    /// fails.
    pub async fn update(&self, id: TaskId, update: TaskUpdate) -> TaskLifecycleResult<Task> {
        let mut task = self.get(id).await?;
        task.merge_output(update.patch);
        if let Some(status) = update.status {
            task.advance(status)?;
        }
        self.repository.update(&task).await?;
        Ok(task)
    }
}
