//! Port into the task context for employee-deletion cleanup.

use crate::identity::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task assignment cleanup.
pub type TaskAssignmentsResult<T> = Result<T, TaskAssignmentsError>;

/// Task-side hook invoked when an employee is deleted.
///
/// The tasks themselves survive; only the assignment is dropped.
#[async_trait]
pub trait TaskAssignments: Send + Sync {
    /// Clears the assignee on every task assigned to the user, bumping each
    /// task's update timestamp to `now`. Returns the number of tasks
    /// touched.
    async fn unassign_user(
        &self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> TaskAssignmentsResult<usize>;
}

/// Errors returned by task assignment cleanup implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskAssignmentsError {
    /// Persistence-layer failure.
    #[error("assignment cleanup error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskAssignmentsError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
