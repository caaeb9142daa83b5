//! Validated scalar fields for accounts and organizations.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated person name, trimmed and 2–30 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 30;

    /// Creates a validated person name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidNameLength`] when the trimmed
    /// value is shorter than 2 or longer than 30 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let trimmed = value.into().trim().to_owned();
        let length = trimmed.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(DirectoryDomainError::InvalidNameLength(length));
        }
        Ok(Self(trimmed))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated email address, trimmed and lowercased.
///
/// Validation is structural only: a non-empty local part, one `@`, and a
/// dotted domain. Deliverability is not this crate's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidEmail`] when the value is
    /// structurally malformed.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(DirectoryDomainError::InvalidEmail(normalized));
        };
        let domain_ok = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
        if local.is_empty() || !domain_ok {
            return Err(DirectoryDomainError::InvalidEmail(normalized));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Employee badge: exactly six ASCII digits, assigned on approval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeBadge(String);

impl EmployeeBadge {
    /// Creates a validated badge.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidBadge`] unless the value is
    /// exactly six ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let digits = value.into();
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DirectoryDomainError::InvalidBadge(digits));
        }
        Ok(Self(digits))
    }

    /// Returns the badge as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmployeeBadge {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmployeeBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated organization name, trimmed and 2–100 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationName(String);

impl OrganizationName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 100;

    /// Creates a validated organization name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidOrganizationNameLength`] when
    /// the trimmed value is shorter than 2 or longer than 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let trimmed = value.into().trim().to_owned();
        let length = trimmed.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(DirectoryDomainError::InvalidOrganizationNameLength(length));
        }
        Ok(Self(trimmed))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OrganizationName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OrganizationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Organization slug used for public registration lookup.
///
/// Lowercase alphanumerics and hyphens only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationSlug(String);

impl OrganizationSlug {
    /// Creates a validated slug.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidSlug`] when the value is empty
    /// or contains characters outside `[a-z0-9-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let slug = value.into();
        let valid = !slug.is_empty()
            && slug
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        if !valid {
            return Err(DirectoryDomainError::InvalidSlug(slug));
        }
        Ok(Self(slug))
    }

    /// Returns the slug as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OrganizationSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OrganizationSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
