//! Lifecycle engine: the gatekeeper for every task mutation.
//!
//! Role and ownership checks, field-level write permissions, and the
//! `completed_at` bookkeeping all live here; the store persists whatever
//! this service has validated.

use crate::error::ErrorKind;
use crate::identity::{Actor, OrganizationId, Role, UserId};
use crate::task::{
    domain::{
        NewTaskData, Task, TaskComment, TaskDescription, TaskDomainError, TaskId, TaskPriority,
        TaskStatus, TaskTitle,
    },
    ports::{
        EmployeeDirectory, EmployeeDirectoryError, TaskFilter, TaskRepository,
        TaskRepositoryError, TaskSort,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
///
/// The owning organization and creator are injected from the actor, never
/// from the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) priority: Option<TaskPriority>,
    pub(crate) assigned_to: Option<UserId>,
    pub(crate) due_date: Option<DateTime<Utc>>,
    pub(crate) tags: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            assigned_to: None,
            due_date: None,
            tags: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority; defaults to `Medium` when unset.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

/// A comment submitted through an update, not yet timestamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub(crate) text: String,
    pub(crate) author: UserId,
}

impl CommentDraft {
    /// Creates a comment draft.
    #[must_use]
    pub fn new(text: impl Into<String>, author: UserId) -> Self {
        Self {
            text: text.into(),
            author,
        }
    }
}

/// Fields both roles may write through a full update.
///
/// `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdits {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Replacement comment list.
    pub comments: Option<Vec<CommentDraft>>,
}

impl TaskEdits {
    /// Creates an empty edit set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the replacement tag list.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Sets the replacement comment list.
    #[must_use]
    pub fn with_comments(mut self, comments: impl IntoIterator<Item = CommentDraft>) -> Self {
        self.comments = Some(comments.into_iter().collect());
        self
    }
}

/// Admin-only full update: shared edits plus assignment, status, and due
/// date changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminTaskUpdate {
    /// Fields writable by both roles.
    pub edits: TaskEdits,
    /// Reassignment target; validated against the organization directory.
    pub assigned_to: Option<UserId>,
    /// Replacement status; follows the `completed_at` side-effect rule.
    pub status: Option<TaskStatus>,
    /// Replacement due date.
    pub due_date: Option<DateTime<Utc>>,
}

impl AdminTaskUpdate {
    /// Creates an empty admin update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shared edits.
    #[must_use]
    pub fn with_edits(mut self, edits: TaskEdits) -> Self {
        self.edits = edits;
        self
    }

    /// Reassigns the task.
    #[must_use]
    pub const fn reassign_to(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Sets the replacement status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the replacement due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Per-role update command.
///
/// The employee variant cannot express assignment, status, or due-date
/// changes, making those writes a type-level impossibility rather than a
/// runtime strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    /// Full update submitted by an admin.
    Admin(AdminTaskUpdate),
    /// Restricted update submitted by the assignee.
    Employee(TaskEdits),
}

/// Filter and ordering options for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Restrict to one status.
    pub status: Option<TaskStatus>,
    /// Restrict to one priority.
    pub priority: Option<TaskPriority>,
    /// Ordering; newest first when unset.
    pub sort: Option<TaskSort>,
}

impl TaskListQuery {
    /// Creates an unfiltered listing query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the listing to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Orders the listing.
    #[must_use]
    pub const fn sorted_by(mut self, sort: TaskSort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// No task exists with the given identifier within the actor's scope.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The operation is restricted to admins.
    #[error("operation requires the admin role")]
    AdminRequired,

    /// The actor is not the task's assignee.
    #[error("task {task} is not assigned to user {user}")]
    NotAssignee {
        /// Task the actor tried to act on.
        task: TaskId,
        /// The acting employee.
        user: UserId,
    },

    /// The actor's account is not active.
    #[error("account {0} is not active")]
    InactiveActor(UserId),

    /// The update payload variant does not match the actor's role.
    #[error("update payload does not match the actor's role")]
    RoleMismatch,

    /// The requested assignee is not an active employee of the
    /// organization.
    #[error("user {0} is not an active employee of this organization")]
    IneligibleAssignee(UserId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] EmployeeDirectoryError),
}

impl TaskLifecycleError {
    /// Classifies the error for the caller-facing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(TaskDomainError::ApprovalRequiresCompleted { .. }) => {
                ErrorKind::InvalidState
            }
            Self::Domain(_) | Self::IneligibleAssignee(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::AdminRequired
            | Self::NotAssignee { .. }
            | Self::InactiveActor(_)
            | Self::RoleMismatch => ErrorKind::Forbidden,
            Self::Repository(_) | Self::Directory(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for task lifecycle operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, D, C>
where
    R: TaskRepository,
    D: EmployeeDirectory,
    C: Clock + Send + Sync,
{
    pub(super) repository: Arc<R>,
    directory: Arc<D>,
    pub(super) clock: Arc<C>,
}

impl<R, D, C> TaskLifecycleService<R, D, C>
where
    R: TaskRepository,
    D: EmployeeDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
        }
    }

    /// Creates a task owned by the admin's organization.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AdminRequired`] for non-admin actors,
    /// [`TaskLifecycleError::IneligibleAssignee`] when the assignee is not
    /// an active employee of the organization, or a validation error for
    /// malformed fields.
    pub async fn create_task(
        &self,
        actor: &Actor,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        ensure_admin(actor)?;
        let title = TaskTitle::new(request.title)?;
        let description = request.description.map(TaskDescription::new).transpose()?;
        if let Some(assignee) = request.assigned_to {
            self.ensure_assignable(assignee, actor.organization())
                .await?;
        }

        let task = Task::new(
            NewTaskData {
                title,
                description,
                priority: request.priority.unwrap_or_default(),
                assigned_to: request.assigned_to,
                created_by: actor.id(),
                organization: actor.organization(),
                due_date: request.due_date,
                tags: request.tags,
            },
            &*self.clock,
        );
        self.repository.store(&task).await?;
        tracing::info!(task = %task.id(), organization = %task.organization(), "task created");
        Ok(task)
    }

    /// Lists tasks within the actor's scope: the whole organization for
    /// admins, own assignments for employees.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InactiveActor`] for inactive accounts
    /// or a repository error.
    pub async fn list_tasks(
        &self,
        actor: &Actor,
        query: TaskListQuery,
    ) -> TaskLifecycleResult<Vec<Task>> {
        ensure_active(actor)?;
        let mut filter = scope_filter(actor);
        if let Some(status) = query.status {
            filter = filter.with_status(status);
        }
        if let Some(priority) = query.priority {
            filter = filter.with_priority(priority);
        }
        Ok(self
            .repository
            .query(filter, query.sort.unwrap_or_default())
            .await?)
    }

    /// Retrieves a single task within the actor's scope.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// in the actor's organization or [`TaskLifecycleError::NotAssignee`]
    /// when an employee requests someone else's task.
    pub async fn get_task(&self, actor: &Actor, id: TaskId) -> TaskLifecycleResult<Task> {
        ensure_active(actor)?;
        self.load_scoped(actor, id).await
    }

    /// Applies a full update with per-role field permissions.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::RoleMismatch`] when the payload variant
    /// does not match the actor's role, plus the scope and validation errors
    /// of [`Self::get_task`] and [`Self::create_task`].
    pub async fn update_task(
        &self,
        actor: &Actor,
        id: TaskId,
        update: TaskUpdate,
    ) -> TaskLifecycleResult<Task> {
        ensure_active(actor)?;
        let mut task = self.load_scoped(actor, id).await?;

        match (actor.role(), update) {
            (Role::Admin, TaskUpdate::Admin(admin_update)) => {
                self.apply_edits(&mut task, admin_update.edits)?;
                if let Some(assignee) = admin_update.assigned_to {
                    self.ensure_assignable(assignee, actor.organization())
                        .await?;
                    task.set_assignee(assignee, &*self.clock);
                }
                if let Some(due_date) = admin_update.due_date {
                    task.set_due_date(due_date, &*self.clock);
                }
                if let Some(status) = admin_update.status {
                    task.set_status(status, &*self.clock);
                }
            }
            (Role::Employee, TaskUpdate::Employee(edits)) => {
                self.apply_edits(&mut task, edits)?;
            }
            _ => return Err(TaskLifecycleError::RoleMismatch),
        }

        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Moves a task to a new status on behalf of the actor.
    ///
    /// The transition graph is permissive by role, not by state adjacency;
    /// ownership is the only gate beyond the status value itself.
    ///
    /// # Errors
    ///
    /// Returns the scope errors of [`Self::get_task`] or a repository
    /// error.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: TaskId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        ensure_active(actor)?;
        let mut task = self.load_scoped(actor, id).await?;
        let previous = task.status();
        task.set_status(status, &*self.clock);
        self.repository.update(&task).await?;
        tracing::debug!(task = %id, from = %previous, to = %status, "task status changed");
        Ok(task)
    }

    /// Approves a completed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AdminRequired`] for non-admin actors or
    /// an invalid-state error when the task is not `Completed`.
    pub async fn approve_task(&self, actor: &Actor, id: TaskId) -> TaskLifecycleResult<Task> {
        ensure_admin(actor)?;
        let mut task = self.load_scoped(actor, id).await?;
        task.approve(&*self.clock)?;
        self.repository.update(&task).await?;
        tracing::info!(task = %id, "task approved");
        Ok(task)
    }

    /// Hard-deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AdminRequired`] for non-admin actors or
    /// [`TaskLifecycleError::NotFound`] when the task does not exist in the
    /// actor's organization.
    pub async fn delete_task(&self, actor: &Actor, id: TaskId) -> TaskLifecycleResult<()> {
        ensure_admin(actor)?;
        let task = self.load_scoped(actor, id).await?;
        self.repository.delete(task.id()).await?;
        tracing::info!(task = %id, "task deleted");
        Ok(())
    }

    /// Loads a task and enforces the actor's scope on it.
    pub(super) async fn load_scoped(
        &self,
        actor: &Actor,
        id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))?;

        if actor.role() == Role::Employee && !task.is_assigned_to(actor.id()) {
            return Err(TaskLifecycleError::NotAssignee {
                task: id,
                user: actor.id(),
            });
        }
        // Cross-organization ids behave as if the task did not exist.
        if task.organization() != actor.organization() {
            return Err(TaskLifecycleError::NotFound(id));
        }
        Ok(task)
    }

    async fn ensure_assignable(
        &self,
        assignee: UserId,
        organization: OrganizationId,
    ) -> TaskLifecycleResult<()> {
        let eligible = self
            .directory
            .is_active_employee(assignee, organization)
            .await?;
        if !eligible {
            return Err(TaskLifecycleError::IneligibleAssignee(assignee));
        }
        Ok(())
    }

    fn apply_edits(&self, task: &mut Task, edits: TaskEdits) -> TaskLifecycleResult<()> {
        if let Some(title) = edits.title {
            task.set_title(TaskTitle::new(title)?, &*self.clock);
        }
        if let Some(description) = edits.description {
            task.set_description(TaskDescription::new(description)?, &*self.clock);
        }
        if let Some(priority) = edits.priority {
            task.set_priority(priority, &*self.clock);
        }
        if let Some(tags) = edits.tags {
            task.set_tags(tags, &*self.clock);
        }
        if let Some(drafts) = edits.comments {
            let comments = drafts
                .into_iter()
                .map(|draft| TaskComment::new(draft.text, draft.author, &*self.clock))
                .collect::<Result<Vec<_>, _>>()?;
            task.set_comments(comments, &*self.clock);
        }
        Ok(())
    }
}

/// Builds the filter scoping a query to what the actor may see.
pub(super) fn scope_filter(actor: &Actor) -> TaskFilter {
    match actor.role() {
        Role::Admin => TaskFilter::new().in_organization(actor.organization()),
        Role::Employee => TaskFilter::new().assigned_to(actor.id()),
    }
}

pub(super) fn ensure_active(actor: &Actor) -> TaskLifecycleResult<()> {
    if !actor.status().is_active() {
        return Err(TaskLifecycleError::InactiveActor(actor.id()));
    }
    Ok(())
}

fn ensure_admin(actor: &Actor) -> TaskLifecycleResult<()> {
    ensure_active(actor)?;
    if !actor.is_admin() {
        return Err(TaskLifecycleError::AdminRequired);
    }
    Ok(())
}
