//! Unit tests for the task bounded context.

mod domain_tests;
mod store_tests;
mod support;
mod update_tests;
