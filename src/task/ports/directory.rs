//! Directory port resolving assignee eligibility.

use crate::identity::{OrganizationId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for employee directory lookups.
pub type EmployeeDirectoryResult<T> = Result<T, EmployeeDirectoryError>;

/// Organization directory consulted before assigning a task.
///
/// Implemented by the user store; the lifecycle engine only needs a yes/no
/// answer and never reads account details through this port.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Returns whether the user is an active employee of the given
    /// organization.
    async fn is_active_employee(
        &self,
        user: UserId,
        organization: OrganizationId,
    ) -> EmployeeDirectoryResult<bool>;
}

/// Errors returned by employee directory implementations.
#[derive(Debug, Clone, Error)]
pub enum EmployeeDirectoryError {
    /// Lookup-layer failure.
    #[error("directory lookup error: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl EmployeeDirectoryError {
    /// Wraps a lookup error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
