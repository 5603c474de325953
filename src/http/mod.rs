//! Bearer-authenticated REST surface over the task service.
//!
//! - [`routes`]: handlers and router assembly
//! - [`auth`]: static bearer-token gate
//! - [`error`]: uniform JSON error envelope
//! - [`state`]: dependency-injected application state
//! - [`server`]: listener plumbing with graceful shutdown

pub mod auth;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::AuthSecret;
pub use error::{ApiError, FieldViolation};
pub use routes::router;
pub use state::AppState;
