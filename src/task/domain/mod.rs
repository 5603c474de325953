//! Domain model for task tracking.
//!
//! The task domain models task creation from client input, shallow merging
//! of worker results into the task output, and validated status
//! transitions while keeping all infrastructure concerns outside of the
//! domain boundary.

mod error;
mod ids;
mod record;
mod status;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use record::{JsonObject, PersistedTaskData, Task};
pub use status::TaskStatus;
