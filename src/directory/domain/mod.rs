//! Domain model for organizations and user accounts.

mod error;
mod fields;
mod organization;
mod user;

pub use error::DirectoryDomainError;
pub use fields::{EmailAddress, EmployeeBadge, OrganizationName, OrganizationSlug, PersonName};
pub use organization::{Organization, PersistedOrganizationData};
pub use user::{AccountProfile, PersistedAccountData, UserAccount};
