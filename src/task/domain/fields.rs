//! Validated scalar fields and comment values for tasks.

use super::TaskDomainError;
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated task title, trimmed and 3–100 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 100;

    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTitleLength`] when the trimmed value
    /// is shorter than 3 or longer than 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let trimmed = value.into().trim().to_owned();
        let length = trimmed.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(TaskDomainError::InvalidTitleLength(length));
        }
        Ok(Self(trimmed))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated task description, trimmed and at most 1000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    const MAX_LENGTH: usize = 1000;

    /// Creates a validated task description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DescriptionTooLong`] when the trimmed value
    /// exceeds 1000 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let trimmed = value.into().trim().to_owned();
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskDomainError::DescriptionTooLong(length));
        }
        Ok(Self(trimmed))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    text: String,
    author: UserId,
    created_at: DateTime<Utc>,
}

impl TaskComment {
    /// Creates a comment stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCommentText`] when the text is blank.
    pub fn new(
        text: impl Into<String>,
        author: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let trimmed = text.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyCommentText);
        }
        Ok(Self {
            text: trimmed,
            author,
            created_at: clock.utc(),
        })
    }

    /// Returns the comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the comment author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
