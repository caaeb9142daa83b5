//! Unit tests for the directory bounded context.

mod domain_tests;
mod provisioning_tests;
mod support;
