//! Repository port for organization persistence.

use crate::directory::domain::{Organization, OrganizationSlug};
use crate::identity::OrganizationId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for organization repository operations.
pub type OrganizationRepositoryResult<T> = Result<T, OrganizationRepositoryError>;

/// Organization persistence contract.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Stores a new organization.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizationRepositoryError::DuplicateName`] or
    /// [`OrganizationRepositoryError::DuplicateSlug`] when uniqueness is
    /// violated.
    async fn store(&self, organization: &Organization) -> OrganizationRepositoryResult<()>;

    /// Finds an organization by identifier.
    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> OrganizationRepositoryResult<Option<Organization>>;

    /// Finds an organization by its public slug.
    async fn find_by_slug(
        &self,
        slug: &OrganizationSlug,
    ) -> OrganizationRepositoryResult<Option<Organization>>;

    /// Lists every organization, for the public registration directory.
    async fn list(&self) -> OrganizationRepositoryResult<Vec<Organization>>;
}

/// Errors returned by organization repository implementations.
#[derive(Debug, Clone, Error)]
pub enum OrganizationRepositoryError {
    /// An organization with the same name already exists.
    #[error("organization name already taken: {0}")]
    DuplicateName(String),

    /// An organization with the same slug already exists.
    #[error("organization slug already taken: {0}")]
    DuplicateSlug(String),

    /// The organization was not found.
    #[error("organization not found: {0}")]
    NotFound(OrganizationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl OrganizationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
