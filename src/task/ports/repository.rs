//! Repository port for task persistence and querying.

use crate::identity::{OrganizationId, UserId};
use crate::task::domain::{Task, TaskId, TaskPriority, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter applied to task queries.
///
/// Every field combines conjunctively. The organization and assignee fields
/// carry the caller's explicit tenant scope; repositories never consult
/// ambient request state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to tasks owned by this organization.
    pub organization: Option<OrganizationId>,
    /// Restrict to tasks assigned to this user.
    pub assigned_to: Option<UserId>,
    /// Restrict to tasks in this status.
    pub status: Option<TaskStatus>,
    /// Restrict to tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Restrict to tasks whose due date is strictly before this instant.
    ///
    /// Tasks without a due date never match.
    pub due_before: Option<DateTime<Utc>>,
    /// Exclude tasks whose status is `Completed` or `Approved`.
    pub exclude_settled: bool,
}

impl TaskFilter {
    /// Creates an empty filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to one organization.
    #[must_use]
    pub const fn in_organization(mut self, organization: OrganizationId) -> Self {
        self.organization = Some(organization);
        self
    }

    /// Restricts the filter to one assignee.
    #[must_use]
    pub const fn assigned_to(mut self, user: UserId) -> Self {
        self.assigned_to = Some(user);
        self
    }

    /// Restricts the filter to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts the filter to tasks due strictly before the given instant.
    #[must_use]
    pub const fn due_before(mut self, instant: DateTime<Utc>) -> Self {
        self.due_before = Some(instant);
        self
    }

    /// Excludes completed and approved tasks.
    #[must_use]
    pub const fn excluding_settled(mut self) -> Self {
        self.exclude_settled = true;
        self
    }

    /// Returns whether the given task matches this filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self
            .organization
            .is_some_and(|org| task.organization() != org)
        {
            return false;
        }
        if self
            .assigned_to
            .is_some_and(|user| !task.is_assigned_to(user))
        {
            return false;
        }
        if self.status.is_some_and(|status| task.status() != status) {
            return false;
        }
        if self
            .priority
            .is_some_and(|priority| task.priority() != priority)
        {
            return false;
        }
        if let Some(cutoff) = self.due_before {
            let due_in_window = task.due_date().is_some_and(|due| due < cutoff);
            if !due_in_window {
                return false;
            }
        }
        if self.exclude_settled && task.status().is_settled() {
            return false;
        }
        true
    }
}

/// Key a task query is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSortKey {
    /// Creation timestamp.
    CreatedAt,
    /// Latest update timestamp.
    UpdatedAt,
    /// Due date; tasks without one sort last.
    DueDate,
    /// Priority, ordered low to urgent.
    Priority,
}

/// Direction a task query is ordered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering applied to task queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskSort {
    /// Sort key.
    pub key: TaskSortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

impl TaskSort {
    /// Creates a sort order.
    #[must_use]
    pub const fn new(key: TaskSortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

impl Default for TaskSort {
    /// Newest first, matching the list endpoints' default.
    fn default() -> Self {
        Self::new(TaskSortKey::CreatedAt, SortDirection::Descending)
    }
}

/// Error returned while parsing sort expressions such as `-created_at`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct ParseTaskSortError(pub String);

impl TryFrom<&str> for TaskSort {
    type Error = ParseTaskSortError;

    /// Parses a sort expression: a key name with an optional leading `-`
    /// for descending order.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let (direction, key_name) = match trimmed.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, trimmed),
        };
        let key = match key_name.to_ascii_lowercase().as_str() {
            "created_at" => TaskSortKey::CreatedAt,
            "updated_at" => TaskSortKey::UpdatedAt,
            "due_date" => TaskSortKey::DueDate,
            "priority" => TaskSortKey::Priority,
            _ => return Err(ParseTaskSortError(value.to_owned())),
        };
        Ok(Self::new(key, direction))
    }
}

/// Task persistence contract.
///
/// Validation and authorization live in the lifecycle engine; repositories
/// persist already-validated aggregates with atomic per-document updates.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Hard-deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Returns a finite, restartable snapshot of the tasks matching the
    /// filter, in the given order.
    async fn query(&self, filter: TaskFilter, sort: TaskSort) -> TaskRepositoryResult<Vec<Task>>;

    /// Sets the status of every listed task in one sweep, bumping
    /// `updated_at` to `now`.
    ///
    /// System action used exclusively by the overdue sweep; bypasses the
    /// lifecycle engine's transition and `completed_at` bookkeeping. Returns
    /// the number of tasks updated; missing ids are skipped.
    async fn bulk_set_status(
        &self,
        ids: &[TaskId],
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize>;

    /// Clears the assignee on every task assigned to the given user,
    /// bumping `updated_at` to `now`. Returns the number of tasks updated.
    async fn clear_assignee(
        &self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
