//! In-memory event publisher for task tracking tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::task::ports::{
    EventPublishError, EventPublishResult, EventPublisher, MessageId, ReceivedMessage,
};

/// Thread-safe in-process publisher recording every published payload.
///
/// Pending messages are queued in publication order and consumed by
/// [`EventPublisher::pull`]; the full publication history stays available
/// through [`InMemoryEventPublisher::published`] for assertions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    state: Arc<Mutex<PublisherState>>,
}

#[derive(Debug, Default)]
struct PublisherState {
    next_id: u64,
    pending: VecDeque<ReceivedMessage>,
    published: Vec<Value>,
}

impl InMemoryEventPublisher {
    /// Creates an empty in-memory publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every payload published so far, in publication order.
    ///
    /// # Errors
    ///
    /// Returns [`EventPublishError::Broker`] when the internal lock is
    /// poisoned.
    pub fn published(&self) -> EventPublishResult<Vec<Value>> {
        let state = self.state.lock().map_err(poisoned)?;
        Ok(state.published.clone())
    }
}

fn poisoned(err: impl std::fmt::Display) -> EventPublishError {
    EventPublishError::broker(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, message: &Value) -> EventPublishResult<MessageId> {
        let mut state = self.state.lock().map_err(poisoned)?;
        state.next_id += 1;
        let id = MessageId::new(state.next_id.to_string());
        state.pending.push_back(ReceivedMessage {
            id: id.clone(),
            payload: message.clone(),
        });
        state.published.push(message.clone());
        Ok(id)
    }

    async fn pull(&self) -> EventPublishResult<Option<ReceivedMessage>> {
        let mut state = self.state.lock().map_err(poisoned)?;
        Ok(state.pending.pop_front())
    }
}
