//! Application services for the task lifecycle.

mod lifecycle;
mod overdue;

pub use lifecycle::{
    AdminTaskUpdate, CommentDraft, CreateTaskRequest, TaskEdits, TaskLifecycleError,
    TaskLifecycleResult, TaskLifecycleService, TaskListQuery, TaskUpdate,
};
