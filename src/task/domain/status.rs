//! Task status and priority classifications.

use super::{ParseTaskPriorityError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// `Approved` is the intended end state. `Overdue` is a transient flag set
/// by the overdue sweep and resolved by moving the task back to
/// `InProgress` or `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// The assignee finished the work; awaiting admin approval.
    Completed,
    /// An admin signed off on the completed work.
    Approved,
    /// The due date passed before the work was completed.
    Overdue,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Completed => "completed",
            Self::Approved => "approved",
            Self::Overdue => "overdue",
        }
    }

    /// Returns whether the status marks finished work.
    ///
    /// Settled tasks carry a `completed_at` timestamp and are skipped by the
    /// overdue sweep.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Completed | Self::Approved)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "approved" => Ok(Self::Approved),
            "overdue" => Ok(Self::Overdue),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority, ordered from least to most urgent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal workload.
    #[default]
    Medium,
    /// Should be picked up soon.
    High,
    /// Drop everything.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}
