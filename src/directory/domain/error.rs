//! Error types for directory domain validation.

use crate::identity::{AccountStatus, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// A person name is outside the 2–30 character range after trimming.
    #[error("name must be 2 to 30 characters, got {0}")]
    InvalidNameLength(usize),

    /// The email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The badge is not a 6-digit number.
    #[error("badge must be exactly 6 digits, got {0:?}")]
    InvalidBadge(String),

    /// An organization name is outside the 2–100 character range after
    /// trimming.
    #[error("organization name must be 2 to 100 characters, got {0}")]
    InvalidOrganizationNameLength(usize),

    /// The organization slug contains characters outside lowercase
    /// alphanumerics and hyphens, or is empty.
    #[error("invalid organization slug: {0:?}")]
    InvalidSlug(String),

    /// An approval or rejection was requested for an account that is no
    /// longer pending.
    #[error("account {user} is {status}, only pending accounts can be decided")]
    StatusChangeRequiresPending {
        /// Account whose status change was refused.
        user: UserId,
        /// Status the account held at the time of the request.
        status: AccountStatus,
    },
}
