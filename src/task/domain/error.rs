//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is outside the 3–100 character range after trimming.
    #[error("task title must be 3 to 100 characters, got {0}")]
    InvalidTitleLength(usize),

    /// The task description exceeds the 1000 character limit.
    #[error("task description cannot exceed 1000 characters, got {0}")]
    DescriptionTooLong(usize),

    /// A comment was submitted with no text.
    #[error("comment text must not be empty")]
    EmptyCommentText,

    /// Approval was requested for a task that is not completed.
    #[error("task {task} must be completed before approval, current status: {status}")]
    ApprovalRequiresCompleted {
        /// Task whose approval was refused.
        task: TaskId,
        /// Status the task held at the time of the request.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
