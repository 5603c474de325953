//! Task aggregate root.

use super::{TaskDomainError, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON object type used for task input and output payloads.
pub type JsonObject = Map<String, Value>;

/// Task aggregate root.
///
/// Serializes to the public wire shape
/// `{id, status, input, output, created_at}`; `output` stays `null` until
/// the first update and is always an object afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    status: TaskStatus,
    input: JsonObject,
    output: Option<JsonObject>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted creation input.
    pub input: JsonObject,
    /// Persisted output object, if any update has occurred.
    pub output: Option<JsonObject>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task from client input.
    ///
    /// The task starts in [`TaskStatus::Todo`] with no output.
    #[must_use]
    pub fn new(input: JsonObject, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            status: TaskStatus::Todo,
            input,
            output: None,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            status: data.status,
            input: data.input,
            output: data.output,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation input object.
    #[must_use]
    pub const fn input(&self) -> &JsonObject {
        &self.input
    }

    /// Returns the output object, absent until the first update.
    #[must_use]
    pub const fn output(&self) -> Option<&JsonObject> {
        self.output.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Shallow-merges `patch` into the task output.
    ///
    /// An absent output starts from the empty object. Patch keys overwrite
    /// existing keys of the same name; all other keys are retained. The
    /// input, status, and creation timestamp are never touched.
    pub fn merge_output(&mut self, patch: JsonObject) {
        let output = self.output.get_or_insert_with(JsonObject::new);
        for (key, value) in patch {
            output.insert(key, value);
        }
    }

    /// Advances the task status through a validated transition.
    ///
    /// Advancing to the current status is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the
    /// transition is not permitted.
    pub fn advance(&mut self, next: TaskStatus) -> Result<(), TaskDomainError> {
        if !self.status.can_advance_to(next) {
            return Err(TaskDomainError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
