//! Employee account administration: registration, approval, and removal.

use crate::directory::domain::{
    AccountProfile, DirectoryDomainError, EmailAddress, EmployeeBadge, OrganizationSlug,
    PersonName, UserAccount,
};
use crate::directory::ports::{
    OrganizationRepository, OrganizationRepositoryError, TaskAssignments, TaskAssignmentsError,
    UserRepository, UserRepositoryError,
};
use crate::error::ErrorKind;
use crate::identity::{Actor, Role, UserId};
use mockable::Clock;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

/// Attempts at finding a free badge before giving up.
const MAX_BADGE_ATTEMPTS: usize = 20;

/// Request payload for public employee registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterEmployeeRequest {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) organization_slug: String,
}

impl RegisterEmployeeRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        organization_slug: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            organization_slug: organization_slug.into(),
        }
    }
}

/// Service-level errors for employee account administration.
#[derive(Debug, Error)]
pub enum EmployeeAccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),

    /// No organization carries the given slug.
    #[error("unknown organization: {0}")]
    UnknownOrganization(String),

    /// The email is already registered.
    #[error("email already registered: {0}")]
    EmailInUse(String),

    /// The operation is restricted to admins.
    #[error("operation requires the admin role")]
    AdminRequired,

    /// The actor's account is not active.
    #[error("account {0} is not active")]
    InactiveActor(UserId),

    /// Employees may only read their own account record.
    #[error("user {0} may only access their own record")]
    OwnRecordOnly(UserId),

    /// The target account does not hold the employee role.
    #[error("account {0} is not an employee")]
    NotAnEmployee(UserId),

    /// No account exists with the given identifier within the actor's
    /// organization.
    #[error("account not found: {0}")]
    NotFound(UserId),

    /// No free badge was found within the attempt budget.
    #[error("could not allocate a unique badge")]
    BadgeAllocation,

    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),

    /// Organization repository operation failed.
    #[error(transparent)]
    Organizations(#[from] OrganizationRepositoryError),

    /// Task assignment cleanup failed.
    #[error(transparent)]
    Assignments(#[from] TaskAssignmentsError),
}

impl EmployeeAccountError {
    /// Classifies the error for the caller-facing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(DirectoryDomainError::StatusChangeRequiresPending { .. }) => {
                ErrorKind::InvalidState
            }
            Self::Domain(_)
            | Self::EmailInUse(_)
            | Self::NotAnEmployee(_)
            | Self::Users(
                UserRepositoryError::DuplicateEmail(_) | UserRepositoryError::DuplicateBadge(_),
            ) => ErrorKind::Validation,
            Self::UnknownOrganization(_)
            | Self::NotFound(_)
            | Self::Users(UserRepositoryError::NotFound(_))
            | Self::Organizations(OrganizationRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::AdminRequired | Self::InactiveActor(_) | Self::OwnRecordOnly(_) => {
                ErrorKind::Forbidden
            }
            Self::BadgeAllocation
            | Self::Users(UserRepositoryError::Persistence(_))
            | Self::Organizations(
                OrganizationRepositoryError::DuplicateName(_)
                | OrganizationRepositoryError::DuplicateSlug(_)
                | OrganizationRepositoryError::Persistence(_),
            )
            | Self::Assignments(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for employee account operations.
pub type EmployeeAccountResult<T> = Result<T, EmployeeAccountError>;

/// Employee account administration service.
#[derive(Clone)]
pub struct EmployeeAccountService<U, O, A, C>
where
    U: UserRepository,
    O: OrganizationRepository,
    A: TaskAssignments,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    organizations: Arc<O>,
    assignments: Arc<A>,
    clock: Arc<C>,
}

impl<U, O, A, C> EmployeeAccountService<U, O, A, C>
where
    U: UserRepository,
    O: OrganizationRepository,
    A: TaskAssignments,
    C: Clock + Send + Sync,
{
    /// Creates a new employee account service.
    #[must_use]
    pub const fn new(
        users: Arc<U>,
        organizations: Arc<O>,
        assignments: Arc<A>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            users,
            organizations,
            assignments,
            clock,
        }
    }

    /// Registers a pending employee against an organization's public slug.
    ///
    /// # Errors
    ///
    /// Returns [`EmployeeAccountError::UnknownOrganization`] for an unknown
    /// slug, [`EmployeeAccountError::EmailInUse`] for a taken email, or a
    /// validation error for malformed fields.
    pub async fn register_employee(
        &self,
        request: RegisterEmployeeRequest,
    ) -> EmployeeAccountResult<UserAccount> {
        let profile = AccountProfile {
            first_name: PersonName::new(request.first_name)?,
            last_name: PersonName::new(request.last_name)?,
            email: EmailAddress::new(request.email)?,
        };
        let slug = OrganizationSlug::new(request.organization_slug)?;

        let organization = self
            .organizations
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| EmployeeAccountError::UnknownOrganization(slug.as_str().to_owned()))?;
        if self.users.find_by_email(&profile.email).await?.is_some() {
            return Err(EmployeeAccountError::EmailInUse(
                profile.email.as_str().to_owned(),
            ));
        }

        let account = UserAccount::register_employee(profile, organization.id(), &*self.clock);
        self.users.store(&account).await?;
        tracing::info!(
            user = %account.id(),
            organization = %organization.id(),
            "employee registered, awaiting approval"
        );
        Ok(account)
    }

    /// Approves a pending employee, assigning a unique 6-digit badge.
    ///
    /// # Errors
    ///
    /// Returns [`EmployeeAccountError::AdminRequired`] for non-admin actors,
    /// an invalid-state error when the account is not pending, or
    /// [`EmployeeAccountError::BadgeAllocation`] when no free badge is found.
    pub async fn approve_employee(
        &self,
        actor: &Actor,
        user: UserId,
    ) -> EmployeeAccountResult<UserAccount> {
        ensure_admin(actor)?;
        let account = self.load_scoped(actor, user).await?;

        for _ in 0..MAX_BADGE_ATTEMPTS {
            let badge = generate_badge()?;
            if self.users.badge_exists(&badge).await? {
                continue;
            }

            let mut approved = account.clone();
            approved.approve(badge, &*self.clock)?;
            match self.users.update(&approved).await {
                Ok(()) => {
                    tracing::info!(user = %user, "employee approved");
                    return Ok(approved);
                }
                // Lost the badge to a concurrent approval; draw again.
                Err(UserRepositoryError::DuplicateBadge(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(EmployeeAccountError::BadgeAllocation)
    }

    /// Rejects a pending employee.
    ///
    /// # Errors
    ///
    /// Returns [`EmployeeAccountError::AdminRequired`] for non-admin actors
    /// or an invalid-state error when the account is not pending.
    pub async fn reject_employee(
        &self,
        actor: &Actor,
        user: UserId,
    ) -> EmployeeAccountResult<UserAccount> {
        ensure_admin(actor)?;
        let mut account = self.load_scoped(actor, user).await?;
        account.reject(&*self.clock)?;
        self.users.update(&account).await?;
        tracing::info!(user = %user, "employee rejected");
        Ok(account)
    }

    /// Retrieves an account: admins read any account of their organization,
    /// employees only their own.
    ///
    /// # Errors
    ///
    /// Returns [`EmployeeAccountError::OwnRecordOnly`] when an employee
    /// requests another account, or [`EmployeeAccountError::NotFound`] when
    /// the account does not exist in the actor's organization.
    pub async fn get_employee(
        &self,
        actor: &Actor,
        user: UserId,
    ) -> EmployeeAccountResult<UserAccount> {
        ensure_active(actor)?;
        if !actor.is_admin() && actor.id() != user {
            return Err(EmployeeAccountError::OwnRecordOnly(actor.id()));
        }
        self.load_scoped(actor, user).await
    }

    /// Lists the employees of the actor's organization.
    ///
    /// # Errors
    ///
    /// Returns [`EmployeeAccountError::AdminRequired`] for non-admin actors.
    pub async fn list_employees(&self, actor: &Actor) -> EmployeeAccountResult<Vec<UserAccount>> {
        ensure_admin(actor)?;
        Ok(self
            .users
            .list_by_organization(actor.organization(), Some(Role::Employee))
            .await?)
    }

    /// Hard-deletes an employee and clears their task assignments. The
    /// tasks themselves survive, unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`EmployeeAccountError::AdminRequired`] for non-admin actors
    /// or [`EmployeeAccountError::NotAnEmployee`] when the target holds the
    /// admin role.
    pub async fn delete_employee(&self, actor: &Actor, user: UserId) -> EmployeeAccountResult<()> {
        ensure_admin(actor)?;
        let account = self.load_scoped(actor, user).await?;
        if account.role() != Role::Employee {
            return Err(EmployeeAccountError::NotAnEmployee(user));
        }

        let now = self.clock.utc();
        let unassigned = self.assignments.unassign_user(user, now).await?;
        self.users.delete(user).await?;
        tracing::info!(user = %user, unassigned, "employee deleted");
        Ok(())
    }

    /// Loads an account and enforces the actor's organization scope on it.
    async fn load_scoped(&self, actor: &Actor, user: UserId) -> EmployeeAccountResult<UserAccount> {
        let account = self
            .users
            .find_by_id(user)
            .await?
            .ok_or(EmployeeAccountError::NotFound(user))?;
        // Cross-organization ids behave as if the account did not exist.
        if account.organization() != actor.organization() {
            return Err(EmployeeAccountError::NotFound(user));
        }
        Ok(account)
    }
}

fn ensure_active(actor: &Actor) -> EmployeeAccountResult<()> {
    if !actor.status().is_active() {
        return Err(EmployeeAccountError::InactiveActor(actor.id()));
    }
    Ok(())
}

fn ensure_admin(actor: &Actor) -> EmployeeAccountResult<()> {
    ensure_active(actor)?;
    if !actor.is_admin() {
        return Err(EmployeeAccountError::AdminRequired);
    }
    Ok(())
}

/// Draws a random 6-digit badge.
fn generate_badge() -> Result<EmployeeBadge, DirectoryDomainError> {
    let value = rand::thread_rng().gen_range(100_000..=999_999_u32);
    EmployeeBadge::new(value.to_string())
}
