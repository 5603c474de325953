//! Adapter implementations of the task ports.
//!
//! - [`postgres`]: diesel-backed durable repository
//! - [`redis`]: redis-streams event publisher
//! - [`memory`]: in-process doubles for tests

pub mod memory;
pub mod postgres;
pub mod redis;
