//! Authenticated actor and account classification types.

use super::{OrganizationId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Role held by a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Organization administrator: creates, assigns, and approves tasks.
    Admin,
    /// Regular employee: works tasks assigned to them.
    Employee,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Approval status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Registered but awaiting admin approval.
    Pending,
    /// Approved; may act on protected resources.
    Active,
    /// Rejected by an admin.
    Rejected,
}

impl AccountStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether the account may act on protected resources.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AccountStatus {
    type Error = ParseAccountStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseAccountStatusError(value.to_owned())),
        }
    }
}

/// Error returned while parsing account statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown account status: {0}")]
pub struct ParseAccountStatusError(pub String);

/// Authenticated caller identity supplied by the external identity provider.
///
/// Services trust this value as-is. The embedded organization is the tenant
/// scope for every query and mutation the actor performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: Role,
    organization: OrganizationId,
    status: AccountStatus,
}

impl Actor {
    /// Creates an actor from provider-supplied claims.
    #[must_use]
    pub const fn new(
        id: UserId,
        role: Role,
        organization: OrganizationId,
        status: AccountStatus,
    ) -> Self {
        Self {
            id,
            role,
            organization,
            status,
        }
    }

    /// Creates an active admin actor.
    #[must_use]
    pub const fn admin(id: UserId, organization: OrganizationId) -> Self {
        Self::new(id, Role::Admin, organization, AccountStatus::Active)
    }

    /// Creates an active employee actor.
    #[must_use]
    pub const fn employee(id: UserId, organization: OrganizationId) -> Self {
        Self::new(id, Role::Employee, organization, AccountStatus::Active)
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the actor's organization scope.
    #[must_use]
    pub const fn organization(&self) -> OrganizationId {
        self.organization
    }

    /// Returns the actor's account status.
    #[must_use]
    pub const fn status(&self) -> AccountStatus {
        self.status
    }

    /// Returns whether the actor holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
