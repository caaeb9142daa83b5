//! Ports for directory persistence and cross-context hooks.

mod assignments;
mod organizations;
mod users;

pub use assignments::{TaskAssignments, TaskAssignmentsError, TaskAssignmentsResult};
pub use organizations::{
    OrganizationRepository, OrganizationRepositoryError, OrganizationRepositoryResult,
};
pub use users::{UserRepository, UserRepositoryError, UserRepositoryResult};
