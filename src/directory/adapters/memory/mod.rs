//! In-memory adapters for directory ports.

mod organization;
mod user;

pub use organization::InMemoryOrganizationRepository;
pub use user::InMemoryUserRepository;
