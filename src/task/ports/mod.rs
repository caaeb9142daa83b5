//! Port contracts for the task lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod directory;
pub mod repository;

pub use directory::{EmployeeDirectory, EmployeeDirectoryError, EmployeeDirectoryResult};
pub use repository::{
    ParseTaskSortError, SortDirection, TaskFilter, TaskRepository, TaskRepositoryError,
    TaskRepositoryResult, TaskSort, TaskSortKey,
};
