//! Repository port for user account persistence.

use crate::directory::domain::{EmailAddress, EmployeeBadge, UserAccount};
use crate::identity::{OrganizationId, Role, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User account persistence contract.
///
/// Email and badge uniqueness are enforced here; the account lifecycle
/// itself lives in the domain aggregate and its services.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new account.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateEmail`] when the email is
    /// already registered.
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()>;

    /// Persists changes to an existing account.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the account does not
    /// exist, or [`UserRepositoryError::DuplicateBadge`] when the badge is
    /// already assigned to another account.
    async fn update(&self, account: &UserAccount) -> UserRepositoryResult<()>;

    /// Finds an account by identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>>;

    /// Finds an account by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserRepositoryResult<Option<UserAccount>>;

    /// Returns whether any account already holds the given badge.
    async fn badge_exists(&self, badge: &EmployeeBadge) -> UserRepositoryResult<bool>;

    /// Lists accounts of an organization, optionally restricted to one role.
    async fn list_by_organization(
        &self,
        organization: OrganizationId,
        role: Option<Role>,
    ) -> UserRepositoryResult<Vec<UserAccount>>;

    /// Hard-deletes an account.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the account does not
    /// exist.
    async fn delete(&self, id: UserId) -> UserRepositoryResult<()>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// An account with the same email already exists.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// Another account already holds the badge.
    #[error("badge already assigned: {0}")]
    DuplicateBadge(String),

    /// The account was not found.
    #[error("account not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
