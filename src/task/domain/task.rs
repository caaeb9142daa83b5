//! Task aggregate root.

use super::{TaskComment, TaskDescription, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskTitle};
use crate::identity::{OrganizationId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task aggregate root.
///
/// All status and assignment changes flow through the methods here so that
/// the `completed_at` invariant holds: the timestamp is set exactly when the
/// status is `Completed` or `Approved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    status: TaskStatus,
    priority: TaskPriority,
    assigned_to: Option<UserId>,
    created_by: UserId,
    organization: OrganizationId,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    tags: Vec<String>,
    comments: Vec<TaskComment>,
    attachments: Vec<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Validated title.
    pub title: TaskTitle,
    /// Optional validated description.
    pub description: Option<TaskDescription>,
    /// Priority; defaults to `Medium` at the service boundary.
    pub priority: TaskPriority,
    /// Optional initial assignee.
    pub assigned_to: Option<UserId>,
    /// Admin who created the task.
    pub created_by: UserId,
    /// Owning organization.
    pub organization: OrganizationId,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<TaskDescription>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted owning organization.
    pub organization: OrganizationId,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted tags.
    pub tags: Vec<String>,
    /// Persisted comments.
    pub comments: Vec<TaskComment>,
    /// Persisted opaque attachment metadata.
    pub attachments: Vec<Value>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the `Todo` status.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            status: TaskStatus::Todo,
            priority: data.priority,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            organization: data.organization,
            due_date: data.due_date,
            completed_at: None,
            tags: data.tags,
            comments: Vec::new(),
            attachments: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            organization: data.organization,
            due_date: data.due_date,
            completed_at: data.completed_at,
            tags: data.tags,
            comments: data.comments,
            attachments: data.attachments,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns whether the task is assigned to the given user.
    #[must_use]
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_to == Some(user)
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the owning organization.
    #[must_use]
    pub const fn organization(&self) -> OrganizationId {
        self.organization
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the comments.
    #[must_use]
    pub fn comments(&self) -> &[TaskComment] {
        &self.comments
    }

    /// Returns the opaque attachment metadata.
    #[must_use]
    pub fn attachments(&self) -> &[Value] {
        &self.attachments
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

    /// Replaces the title.
    pub fn set_title(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: TaskDescription, clock: &impl Clock) {
        self.description = Some(description);
        self.touch(clock);
    }

    /// Replaces the priority.
    pub fn set_priority(&mut self, priority: TaskPriority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Replaces the tags.
    pub fn set_tags(&mut self, tags: Vec<String>, clock: &impl Clock) {
        self.tags = tags;
        self.touch(clock);
    }

    /// Replaces the comment list.
    pub fn set_comments(&mut self, comments: Vec<TaskComment>, clock: &impl Clock) {
        self.comments = comments;
        self.touch(clock);
    }

    /// Replaces the due date.
    pub fn set_due_date(&mut self, due_date: DateTime<Utc>, clock: &impl Clock) {
        self.due_date = Some(due_date);
        self.touch(clock);
    }

    /// Assigns the task to an employee.
    ///
    /// Eligibility of the assignee (active employee of the same
    /// organization) is checked at the service boundary.
    pub fn set_assignee(&mut self, user: UserId, clock: &impl Clock) {
        self.assigned_to = Some(user);
        self.touch(clock);
    }

    /// Moves the task to a new status.
    ///
    /// The transition graph is deliberately permissive: any status may be
    /// set from any other, with role and ownership enforced at the service
    /// boundary. Entering `Completed` or `Approved` from outside that pair
    /// stamps `completed_at`; moving to any other status clears it.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        if status.is_settled() {
            if !self.status.is_settled() {
                self.completed_at = Some(clock.utc());
            }
        } else {
            self.completed_at = None;
        }
        self.status = status;
        self.touch(clock);
    }

    /// Approves a completed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ApprovalRequiresCompleted`] when the
    /// current status is anything other than `Completed`.
    pub fn approve(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Completed {
            return Err(TaskDomainError::ApprovalRequiresCompleted {
                task: self.id,
                status: self.status,
            });
        }
        self.set_status(TaskStatus::Approved, clock);
        Ok(())
    }

    /// Overwrites the status without lifecycle bookkeeping.
    ///
    /// Store-level operation used by the overdue sweep, which only ever
    /// targets unsettled tasks; `completed_at` is left untouched.
    pub(crate) fn force_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Clears the assignee without role checks.
    ///
    /// Store-level operation used when an employee is deleted.
    pub(crate) fn drop_assignee(&mut self, now: DateTime<Utc>) {
        self.assigned_to = None;
        self.updated_at = now;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
