//! Caller-facing error classification.
//!
//! Service errors across the crate map onto a small taxonomy so that an
//! outer transport layer can pick a response shape without inspecting
//! individual variants. Unexpected failures (storage unavailable, poisoned
//! locks) classify as [`ErrorKind::Internal`] and must not leak internal
//! detail to untrusted callers.

/// Business-level classification of a service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Actor lacks the role or ownership required for the operation.
    Forbidden,
    /// The referenced entity does not exist.
    NotFound,
    /// The entity exists but is in the wrong lifecycle state.
    InvalidState,
    /// Unexpected failure unrelated to the request itself.
    Internal,
}
