//! Task status enumeration and transition rules.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// A task starts in [`TaskStatus::Todo`]. The service never advances the
/// status on its own; an external worker drives transitions through the
/// update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Todo,
    /// A worker has picked up the task.
    InProgress,
    /// Task work finished successfully.
    Done,
    /// Task work failed.
    Error,
}

impl TaskStatus {
    /// Returns the canonical wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
            Self::Error => "ERROR",
        }
    }

    /// Returns `true` when no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Returns `true` when advancing from `self` to `next` is permitted.
    ///
    /// Advancing to the current status is always permitted as a no-op.
    /// Otherwise a task may only move forward: `TODO` to any other status,
    /// `IN_PROGRESS` to `DONE` or `ERROR`. `DONE` and `ERROR` are terminal.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Todo, _)
            | (Self::InProgress, Self::InProgress | Self::Done | Self::Error)
            | (Self::Done, Self::Done)
            | (Self::Error, Self::Error) => true,
            _ => false,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, ParseTaskStatusError> {
        match value.trim() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            "ERROR" => Ok(Self::Error),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
