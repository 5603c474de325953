//! Dependency-injected application state.

use mockable::Clock;
use std::sync::Arc;

use crate::config::UpdateIdMismatch;
use crate::task::{
    ports::{EventPublisher, TaskRepository},
    services::TaskLifecycleService,
};

/// State shared across request handlers.
///
/// The process owns exactly one service instance and hands it to
/// handlers by reference; there are no ambient globals.
pub struct AppState<R, P, C>
where
    R: TaskRepository,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Task lifecycle orchestration service.
    pub tasks: Arc<TaskLifecycleService<R, P, C>>,
    /// Policy for conflicting update body and path identifiers.
    pub update_id_mismatch: UpdateIdMismatch,
}

impl<R, P, C> Clone for AppState<R, P, C>
where
    R: TaskRepository,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            update_id_mismatch: self.update_id_mismatch,
        }
    }
}

impl<R, P, C> AppState<R, P, C>
where
    R: TaskRepository,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates application state over one service instance.
    #[must_use]
    pub const fn new(
        tasks: Arc<TaskLifecycleService<R, P, C>>,
        update_id_mismatch: UpdateIdMismatch,
    ) -> Self {
        Self {
            tasks,
            update_id_mismatch,
        }
    }
}
