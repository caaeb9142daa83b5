//! In-memory organization repository.

use crate::directory::domain::{Organization, OrganizationSlug};
use crate::directory::ports::{
    OrganizationRepository, OrganizationRepositoryError, OrganizationRepositoryResult,
};
use crate::identity::OrganizationId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory organization repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrganizationRepository {
    organizations: Arc<RwLock<HashMap<OrganizationId, Organization>>>,
}

impl InMemoryOrganizationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn read_organizations<T>(
    organizations: &Arc<RwLock<HashMap<OrganizationId, Organization>>>,
    f: impl FnOnce(&HashMap<OrganizationId, Organization>) -> T,
) -> OrganizationRepositoryResult<T> {
    let guard = organizations.read().map_err(|err| {
        OrganizationRepositoryError::persistence(std::io::Error::other(err.to_string()))
    })?;
    Ok(f(&guard))
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn store(&self, organization: &Organization) -> OrganizationRepositoryResult<()> {
        let mut guard = self.organizations.write().map_err(|err| {
            OrganizationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if guard
            .values()
            .any(|existing| existing.name() == organization.name())
        {
            return Err(OrganizationRepositoryError::DuplicateName(
                organization.name().as_str().to_owned(),
            ));
        }
        if guard
            .values()
            .any(|existing| existing.slug() == organization.slug())
        {
            return Err(OrganizationRepositoryError::DuplicateSlug(
                organization.slug().as_str().to_owned(),
            ));
        }
        guard.insert(organization.id(), organization.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> OrganizationRepositoryResult<Option<Organization>> {
        read_organizations(&self.organizations, |organizations| {
            organizations.get(&id).cloned()
        })
    }

    async fn find_by_slug(
        &self,
        slug: &OrganizationSlug,
    ) -> OrganizationRepositoryResult<Option<Organization>> {
        read_organizations(&self.organizations, |organizations| {
            organizations
                .values()
                .find(|organization| organization.slug() == slug)
                .cloned()
        })
    }

    async fn list(&self) -> OrganizationRepositoryResult<Vec<Organization>> {
        read_organizations(&self.organizations, |organizations| {
            let mut all: Vec<Organization> = organizations.values().cloned().collect();
            all.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
            all
        })
    }
}
