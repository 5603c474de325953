//! Taskrelay: a minimal task-tracking HTTP service.
//!
//! Clients submit a task description, the service persists it in
//! `PostgreSQL`, publishes a creation event to a message stream, and later
//! allows polling and updating the task's status and output. A downstream
//! worker (outside this crate) consumes published events and reports back
//! through the update endpoint.
//!
//! # Architecture
//!
//! Taskrelay follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, broker)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, persistence, and event publication
//! - [`http`]: Bearer-authenticated REST surface over the task service
//! - [`config`]: Environment-driven process configuration

pub mod config;
pub mod http;
pub mod task;
