//! In-memory adapters for task tracking tests.

mod publisher;
mod repository;

pub use publisher::InMemoryEventPublisher;
pub use repository::InMemoryTaskRepository;
