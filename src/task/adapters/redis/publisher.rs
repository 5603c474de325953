//! Redis-streams event publisher.
//!
//! Publishing appends the serialized payload to the destination stream
//! with `XADD`; the broker-assigned stream entry id becomes the message
//! identifier. Pulling reads at most one pending entry through a consumer
//! group named after the subscription, creating the group (and an empty
//! stream) on first use.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::streams::StreamReadReply;
use serde_json::Value;

use crate::task::ports::{
    EventPublishError, EventPublishResult, EventPublisher, MessageId, ReceivedMessage,
};

/// Stream field carrying the serialized event payload.
const PAYLOAD_FIELD: &str = "payload";

/// Consumer name reported to the broker when pulling.
const CONSUMER_NAME: &str = "taskrelay";

/// Redis-streams backed event publisher.
#[derive(Debug, Clone)]
pub struct RedisEventPublisher {
    client: redis::Client,
    topic: String,
    subscription: String,
}

impl RedisEventPublisher {
    /// Creates a publisher over an existing Redis client.
    #[must_use]
    pub fn new(
        client: redis::Client,
        topic: impl Into<String>,
        subscription: impl Into<String>,
    ) -> Self {
        Self {
            client,
            topic: topic.into(),
            subscription: subscription.into(),
        }
    }

    /// Creates a publisher from a Redis connection URL.
    ///
    /// # Errors
    ///
    /// Returns [`EventPublishError::Broker`] when the URL is invalid.
    pub fn from_url(
        url: &str,
        topic: impl Into<String>,
        subscription: impl Into<String>,
    ) -> EventPublishResult<Self> {
        let client = redis::Client::open(url).map_err(EventPublishError::broker)?;
        Ok(Self::new(client, topic, subscription))
    }

    async fn connection(&self) -> EventPublishResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(EventPublishError::broker)
    }

    /// Creates the consumer group if it does not exist yet.
    async fn ensure_group(&self, connection: &mut MultiplexedConnection) -> EventPublishResult<()> {
        let created: Result<(), redis::RedisError> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.topic)
            .arg(&self.subscription)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(connection)
            .await;
        match created {
            Ok(()) => Ok(()),
            Err(err) if err.code() == Some("BUSYGROUP") => Ok(()),
            Err(err) => Err(EventPublishError::broker(err)),
        }
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, message: &Value) -> EventPublishResult<MessageId> {
        let payload = serde_json::to_string(message)?;
        let mut connection = self.connection().await?;
        let entry_id: String = redis::cmd("XADD")
            .arg(&self.topic)
            .arg("*")
            .arg(PAYLOAD_FIELD)
            .arg(payload)
            .query_async(&mut connection)
            .await
            .map_err(EventPublishError::broker)?;
        Ok(MessageId::new(entry_id))
    }

    async fn pull(&self) -> EventPublishResult<Option<ReceivedMessage>> {
        let mut connection = self.connection().await?;
        self.ensure_group(&mut connection).await?;

        let reply: Option<StreamReadReply> = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.subscription)
            .arg(CONSUMER_NAME)
            .arg("COUNT")
            .arg(1)
            .arg("STREAMS")
            .arg(&self.topic)
            .arg(">")
            .query_async(&mut connection)
            .await
            .map_err(EventPublishError::broker)?;

        let Some(entry) = reply
            .into_iter()
            .flat_map(|r| r.keys)
            .flat_map(|key| key.ids)
            .next()
        else {
            return Ok(None);
        };

        let raw = entry.map.get(PAYLOAD_FIELD).ok_or_else(|| {
            EventPublishError::broker(std::io::Error::other("stream entry has no payload field"))
        })?;
        let text: String = redis::from_redis_value(raw).map_err(EventPublishError::broker)?;
        let payload = serde_json::from_str(&text)?;

        Ok(Some(ReceivedMessage {
            id: MessageId::new(entry.id),
            payload,
        }))
    }
}
