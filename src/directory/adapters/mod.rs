//! Adapter implementations for directory ports, plus the bridges that let
//! each context satisfy the other's outbound port.

pub mod memory;
pub mod postgres;

use crate::directory::ports::{
    TaskAssignments, TaskAssignmentsError, TaskAssignmentsResult, UserRepository,
};
use crate::identity::{OrganizationId, Role, UserId};
use crate::task::ports::{
    EmployeeDirectory, EmployeeDirectoryError, EmployeeDirectoryResult, TaskRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Any user store can answer the task context's assignee-eligibility
/// question: the user must exist, be active, hold the employee role, and
/// belong to the given organization.
#[async_trait]
impl<R> EmployeeDirectory for R
where
    R: UserRepository,
{
    async fn is_active_employee(
        &self,
        user: UserId,
        organization: OrganizationId,
    ) -> EmployeeDirectoryResult<bool> {
        let account = self
            .find_by_id(user)
            .await
            .map_err(EmployeeDirectoryError::lookup)?;
        Ok(account.is_some_and(|account| {
            account.status().is_active()
                && account.role() == Role::Employee
                && account.organization() == organization
        }))
    }
}

/// Any task store can perform the directory context's deletion cleanup.
#[async_trait]
impl<R> TaskAssignments for R
where
    R: TaskRepository,
{
    async fn unassign_user(
        &self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> TaskAssignmentsResult<usize> {
        self.clear_assignee(user, now)
            .await
            .map_err(TaskAssignmentsError::persistence)
    }
}
