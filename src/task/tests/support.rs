//! Shared fixtures for task service tests.

use crate::identity::{Actor, OrganizationId, UserId};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    ports::{EmployeeDirectory, EmployeeDirectoryResult},
    services::TaskLifecycleService,
};
use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::HashSet;
use std::sync::Arc;

/// Directory double answering eligibility from a fixed member set.
pub(super) struct StubDirectory {
    eligible: HashSet<(UserId, OrganizationId)>,
}

impl StubDirectory {
    pub(super) fn new() -> Self {
        Self {
            eligible: HashSet::new(),
        }
    }

    pub(super) fn with_member(mut self, user: UserId, organization: OrganizationId) -> Self {
        self.eligible.insert((user, organization));
        self
    }
}

#[async_trait]
impl EmployeeDirectory for StubDirectory {
    async fn is_active_employee(
        &self,
        user: UserId,
        organization: OrganizationId,
    ) -> EmployeeDirectoryResult<bool> {
        Ok(self.eligible.contains(&(user, organization)))
    }
}

pub(super) type TestService =
    TaskLifecycleService<InMemoryTaskRepository, StubDirectory, DefaultClock>;

pub(super) fn service_with(directory: StubDirectory) -> TestService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(directory),
        Arc::new(DefaultClock),
    )
}

/// An organization with an active admin and one active employee, plus the
/// service wired so the employee is assignable.
pub(super) struct Workspace {
    pub(super) service: TestService,
    pub(super) admin: Actor,
    pub(super) employee: Actor,
}

pub(super) fn workspace() -> Workspace {
    let organization = OrganizationId::new();
    let admin = Actor::admin(UserId::new(), organization);
    let employee = Actor::employee(UserId::new(), organization);
    let directory = StubDirectory::new().with_member(employee.id(), organization);
    Workspace {
        service: service_with(directory),
        admin,
        employee,
    }
}
