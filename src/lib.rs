//! Bookstore API tests - ordered, stateful checks of a bookstore REST service
//!
//! This library provides the HTTP client, assertions and scenario runner
//! used by the `bookstore-tests` CLI.

pub mod assertions;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod common;
pub mod data;
pub mod http;
pub mod model;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use testing::{run_scenario, RunSettings, ScenarioKind, ScenarioState, TestResult};
