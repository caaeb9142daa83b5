//! Diesel row models for directory persistence.

use super::schema::{organizations, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique login email.
    pub email: String,
    /// Account role.
    pub role: String,
    /// Approval status.
    pub status: String,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Unique badge, if assigned.
    pub badge: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-row update model for user accounts.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct UserRecord {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique login email.
    pub email: String,
    /// Account role.
    pub role: String,
    /// Approval status.
    pub status: String,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Unique badge, if assigned.
    pub badge: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for organizations.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrganizationRow {
    /// Organization identifier.
    pub id: uuid::Uuid,
    /// Unique display name.
    pub name: String,
    /// Unique public registration slug.
    pub slug: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for organizations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organizations)]
pub struct OrganizationRecord {
    /// Organization identifier.
    pub id: uuid::Uuid,
    /// Unique display name.
    pub name: String,
    /// Unique public registration slug.
    pub slug: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
