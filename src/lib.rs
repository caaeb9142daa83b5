//! Foreman: multi-tenant task tracking core.
//!
//! This crate provides the core functionality for a multi-tenant task
//! tracker: organizations register employees, admins approve them, and both
//! roles move tasks through a status lifecycle with on-demand overdue
//! detection.
//!
//! # Architecture
//!
//! Foreman follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`identity`]: Authenticated actor values and shared identifiers
//! - [`directory`]: Organization and employee account management
//! - [`task`]: Task store, lifecycle engine, and overdue sweep
//! - [`error`]: Caller-facing error classification

pub mod directory;
pub mod error;
pub mod identity;
pub mod task;
