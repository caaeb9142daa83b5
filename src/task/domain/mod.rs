//! Domain model for the task lifecycle.
//!
//! Validated field types, the status and priority classifications, and the
//! [`Task`] aggregate that owns the `completed_at` invariant. Infrastructure
//! concerns stay outside the domain boundary.

mod error;
mod fields;
mod ids;
mod status;
mod task;

pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use fields::{TaskComment, TaskDescription, TaskTitle};
pub use ids::TaskId;
pub use status::{TaskPriority, TaskStatus};
pub use task::{NewTaskData, PersistedTaskData, Task};
