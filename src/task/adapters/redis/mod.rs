//! Redis adapters for task event publication.

mod publisher;

pub use publisher::RedisEventPublisher;
