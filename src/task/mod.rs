//! Task bounded context: aggregate, persistence ports, adapters, and the
//! lifecycle engine that arbitrates every mutation.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
