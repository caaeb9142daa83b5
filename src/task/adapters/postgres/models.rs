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
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Optional assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Creator.
    pub created_by: uuid::Uuid,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Comment payloads.
    pub comments: Value,
    /// Opaque attachment metadata.
    pub attachments: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-row update model for task records.
///
/// `treat_none_as_null` makes whole-aggregate saves clear nullable columns
/// (assignee, due date, completion timestamp) when the domain value is
/// absent.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Optional assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Creator.
    pub created_by: uuid::Uuid,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Comment payloads.
    pub comments: Value,
    /// Opaque attachment metadata.
    pub attachments: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
