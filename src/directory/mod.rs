//! Directory bounded context: organizations, user accounts, and the
//! approval workflow that turns registrations into active employees.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
