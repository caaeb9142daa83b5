//! User account aggregate.

use super::{DirectoryDomainError, EmailAddress, EmployeeBadge, PersonName};
use crate::identity::{AccountStatus, OrganizationId, Role, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A user account within one organization.
///
/// Employees register as `Pending` and hold no badge until an admin approves
/// them; the badge is assigned exactly once, at approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    id: UserId,
    first_name: PersonName,
    last_name: PersonName,
    email: EmailAddress,
    role: Role,
    status: AccountStatus,
    organization: OrganizationId,
    badge: Option<EmployeeBadge>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Profile fields shared by every way of opening an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Unique login email.
    pub email: EmailAddress,
}

/// Parameter object for reconstructing a persisted account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAccountData {
    /// Persisted account identifier.
    pub id: UserId,
    /// Persisted given name.
    pub first_name: PersonName,
    /// Persisted family name.
    pub last_name: PersonName,
    /// Persisted email.
    pub email: EmailAddress,
    /// Persisted role.
    pub role: Role,
    /// Persisted approval status.
    pub status: AccountStatus,
    /// Persisted organization.
    pub organization: OrganizationId,
    /// Persisted badge, if assigned.
    pub badge: Option<EmployeeBadge>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Registers a new employee in the `Pending` status.
    #[must_use]
    pub fn register_employee(
        profile: AccountProfile,
        organization: OrganizationId,
        clock: &impl Clock,
    ) -> Self {
        Self::open(profile, Role::Employee, AccountStatus::Pending, organization, clock)
    }

    /// Opens the founding admin account of a new organization.
    ///
    /// Founders are active immediately; there is nobody to approve them.
    #[must_use]
    pub fn founding_admin(
        profile: AccountProfile,
        organization: OrganizationId,
        clock: &impl Clock,
    ) -> Self {
        Self::open(profile, Role::Admin, AccountStatus::Active, organization, clock)
    }

    fn open(
        profile: AccountProfile,
        role: Role,
        status: AccountStatus,
        organization: OrganizationId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            role,
            status,
            organization,
            badge: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an account from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAccountData) -> Self {
        Self {
            id: data.id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            role: data.role,
            status: data.status,
            organization: data.organization,
            badge: data.badge,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the given name.
    #[must_use]
    pub const fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Returns the family name.
    #[must_use]
    pub const fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Returns the email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the approval status.
    #[must_use]
    pub const fn status(&self) -> AccountStatus {
        self.status
    }

    /// Returns the organization the account belongs to.
    #[must_use]
    pub const fn organization(&self) -> OrganizationId {
        self.organization
    }

    /// Returns the badge, if assigned.
    #[must_use]
    pub const fn badge(&self) -> Option<&EmployeeBadge> {
        self.badge.as_ref()
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

    /// Approves a pending account, assigning its badge.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::StatusChangeRequiresPending`] when
    /// the account is not `Pending`.
    pub fn approve(
        &mut self,
        badge: EmployeeBadge,
        clock: &impl Clock,
    ) -> Result<(), DirectoryDomainError> {
        self.ensure_pending()?;
        self.status = AccountStatus::Active;
        self.badge = Some(badge);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Rejects a pending account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::StatusChangeRequiresPending`] when
    /// the account is not `Pending`.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), DirectoryDomainError> {
        self.ensure_pending()?;
        self.status = AccountStatus::Rejected;
        self.updated_at = clock.utc();
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), DirectoryDomainError> {
        if self.status != AccountStatus::Pending {
            return Err(DirectoryDomainError::StatusChangeRequiresPending {
                user: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}
