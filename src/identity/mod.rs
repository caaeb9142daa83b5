//! Shared identity kernel.
//!
//! Identifiers and the authenticated [`Actor`] value that an external
//! identity provider attaches to every request. The core trusts this input
//! and never re-derives it; the actor's organization is the explicit tenant
//! scope threaded through every operation.

mod actor;
mod ids;

pub use actor::{AccountStatus, Actor, ParseAccountStatusError, ParseRoleError, Role};
pub use ids::{OrganizationId, UserId};
