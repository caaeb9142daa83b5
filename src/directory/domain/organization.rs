//! Organization aggregate.

use super::{OrganizationName, OrganizationSlug};
use crate::identity::OrganizationId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A tenant organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    id: OrganizationId,
    name: OrganizationName,
    slug: OrganizationSlug,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOrganizationData {
    /// Persisted organization identifier.
    pub id: OrganizationId,
    /// Persisted unique name.
    pub name: OrganizationName,
    /// Persisted unique slug.
    pub slug: OrganizationSlug,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new organization.
    #[must_use]
    pub fn new(name: OrganizationName, slug: OrganizationSlug, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: OrganizationId::new(),
            name,
            slug,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an organization from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedOrganizationData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            slug: data.slug,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the organization identifier.
    #[must_use]
    pub const fn id(&self) -> OrganizationId {
        self.id
    }

    /// Returns the unique name.
    #[must_use]
    pub const fn name(&self) -> &OrganizationName {
        &self.name
    }

    /// Returns the unique slug used for public registration lookup.
    #[must_use]
    pub const fn slug(&self) -> &OrganizationSlug {
        &self.slug
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
