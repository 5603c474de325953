//! Publisher port for task event notification.
//!
//! Publication is a best-effort side channel: the task row remains the
//! durable source of truth, and a broker failure after a committed write
//! is surfaced to the caller without any compensating action.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event publisher operations.
pub type EventPublishResult<T> = Result<T, EventPublishError>;

/// Broker-assigned identifier for a published message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    /// Wraps a broker-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message pulled from the subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Broker-assigned message identifier.
    pub id: MessageId,
    /// Deserialized message payload.
    pub payload: Value,
}

/// Task event notification contract.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Serializes `message`, sends it to the destination topic, awaits the
    /// broker acknowledgement, and returns the broker-assigned message
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EventPublishError`] when serialization fails or the
    /// broker rejects the message.
    async fn publish(&self, message: &Value) -> EventPublishResult<MessageId>;

    /// Fetches at most one pending message from the subscription.
    ///
    /// Returns `None` when no message is pending. Present for contract
    /// symmetry with the broker client; not wired to any HTTP operation.
    ///
    /// # Errors
    ///
    /// Returns [`EventPublishError::Broker`] when the broker cannot be
    /// reached or replies with an unexpected payload.
    async fn pull(&self) -> EventPublishResult<Option<ReceivedMessage>>;
}

/// Errors returned by event publisher implementations.
#[derive(Debug, Clone, Error)]
pub enum EventPublishError {
    /// The message payload could not be serialized.
    #[error("event serialization failed: {0}")]
    Serialization(Arc<serde_json::Error>),

    /// Broker-layer failure.
    #[error("broker error: {0}")]
    Broker(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventPublishError {
    /// Wraps a broker error.
    #[must_use]
    pub fn broker(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Broker(Arc::new(err))
    }
}

impl From<serde_json::Error> for EventPublishError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}
