//! Shared fixtures for directory service tests.

use crate::directory::adapters::memory::{InMemoryOrganizationRepository, InMemoryUserRepository};
use crate::directory::domain::{Organization, UserAccount};
use crate::directory::services::{
    CreateOrganizationRequest, EmployeeAccountService, OrganizationProvisioningService,
    RegisterEmployeeRequest,
};
use crate::identity::Actor;
use crate::task::adapters::memory::InMemoryTaskRepository;
use mockable::DefaultClock;
use std::sync::Arc;

pub(super) type TestProvisioning = OrganizationProvisioningService<
    InMemoryOrganizationRepository,
    InMemoryUserRepository,
    DefaultClock,
>;

pub(super) type TestAccounts = EmployeeAccountService<
    InMemoryUserRepository,
    InMemoryOrganizationRepository,
    InMemoryTaskRepository,
    DefaultClock,
>;

/// Both directory services wired over shared in-memory stores, with the
/// task store standing in as the assignment cleanup hook.
pub(super) struct Directory {
    pub(super) users: Arc<InMemoryUserRepository>,
    pub(super) tasks: Arc<InMemoryTaskRepository>,
    pub(super) provisioning: TestProvisioning,
    pub(super) accounts: TestAccounts,
}

pub(super) fn directory() -> Directory {
    let users = Arc::new(InMemoryUserRepository::new());
    let organizations = Arc::new(InMemoryOrganizationRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    Directory {
        users: Arc::clone(&users),
        tasks: Arc::clone(&tasks),
        provisioning: OrganizationProvisioningService::new(
            Arc::clone(&organizations),
            Arc::clone(&users),
            Arc::clone(&clock),
        ),
        accounts: EmployeeAccountService::new(users, organizations, tasks, clock),
    }
}

pub(super) fn actor_for(account: &UserAccount) -> Actor {
    Actor::new(
        account.id(),
        account.role(),
        account.organization(),
        account.status(),
    )
}

impl Directory {
    /// Provisions an organization and returns it with its admin actor.
    pub(super) async fn provision(
        &self,
        name: &str,
        founder_email: &str,
    ) -> eyre::Result<(Organization, Actor)> {
        let registration = self
            .provisioning
            .create_organization(CreateOrganizationRequest::new(
                name,
                "Avery",
                "Founder",
                founder_email,
            ))
            .await?;
        let admin = actor_for(&registration.admin);
        Ok((registration.organization, admin))
    }

    /// Registers and approves an employee, returning the approved account.
    pub(super) async fn hire(
        &self,
        organization: &Organization,
        admin: &Actor,
        email: &str,
    ) -> eyre::Result<UserAccount> {
        let pending = self
            .accounts
            .register_employee(RegisterEmployeeRequest::new(
                "Robin",
                "Worker",
                email,
                organization.slug().as_str(),
            ))
            .await?;
        let approved = self.accounts.approve_employee(admin, pending.id()).await?;
        Ok(approved)
    }
}
