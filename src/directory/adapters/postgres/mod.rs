//! `PostgreSQL` adapters for directory persistence.

mod models;
mod organizations;
mod schema;
mod users;

pub use organizations::PostgresOrganizationRepository;
pub use users::{DirectoryPgPool, PostgresUserRepository};
