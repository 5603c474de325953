//! Port contracts for task tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod publisher;
pub mod repository;

pub use publisher::{
    EventPublishError, EventPublishResult, EventPublisher, MessageId, ReceivedMessage,
};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
