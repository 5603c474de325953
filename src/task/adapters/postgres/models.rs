//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Creation input payload.
    pub input: Value,
    /// Output payload, null until the first update.
    pub output: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Creation input payload.
    pub input: Value,
    /// Output payload, null until the first update.
    pub output: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
