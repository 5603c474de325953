//! Environment-driven process configuration.
//!
//! All settings come from the process environment at startup (the server
//! binary loads `.env` first via `dotenvy`). A missing shared secret is
//! deliberately not a startup failure: the auth gate surfaces it as a
//! misconfiguration at request time instead.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

/// Default stream key for task creation events.
const DEFAULT_TOPIC: &str = "task-events";

/// Default consumer group for the pull side of the event client.
const DEFAULT_SUBSCRIPTION: &str = "task-workers";

/// Default HTTP bind address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// An environment variable holds an unusable value.
    #[error("invalid value for environment variable {name}: {value}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Policy for a `task_id` in the update body that conflicts with the
/// task id in the request path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateIdMismatch {
    /// Reject the request with a validation failure.
    #[default]
    Reject,
    /// Accept the request and discard the body field.
    Ignore,
}

impl FromStr for UpdateIdMismatch {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "ignore" => Ok(Self::Ignore),
            _ => Err(value.to_owned()),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Redis broker URL.
    pub redis_url: String,
    /// Destination stream for task creation events.
    pub events_topic: String,
    /// Consumer group used by the pull side of the event client.
    pub events_subscription: String,
    /// Shared-secret bearer token; absence surfaces at request time.
    pub api_key: Option<String>,
    /// HTTP bind address.
    pub bind_addr: SocketAddr,
    /// Policy for conflicting update body and path identifiers.
    pub update_id_mismatch: UpdateIdMismatch,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is absent or a
    /// value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_raw = var_or("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let mismatch_raw = var_or("UPDATE_ID_MISMATCH", "reject");
        let update_id_mismatch =
            mismatch_raw
                .parse()
                .map_err(|value: String| ConfigError::Invalid {
                    name: "UPDATE_ID_MISMATCH",
                    value,
                })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            events_topic: var_or("TASK_EVENTS_TOPIC", DEFAULT_TOPIC),
            events_subscription: var_or("TASK_EVENTS_SUBSCRIPTION", DEFAULT_SUBSCRIPTION),
            api_key: env::var("API_KEY").ok().filter(|key| !key.is_empty()),
            bind_addr,
            update_id_mismatch,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn var_or(name: &'static str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
