//! Task tracking for taskrelay.
//!
//! This module implements the task lifecycle: creating task records from
//! client input, publishing a creation event to the message stream,
//! retrieving tasks by identifier, merging worker results into the task
//! output, and advancing the status through validated transitions. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
