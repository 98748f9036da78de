//! Error types for the bookstore test runner
//!
//! Errors fall into three families: setup failures that stop a scenario
//! before any step runs, assertion failures, and transport failures.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the test runner
#[derive(Error, Debug)]
pub enum Error {
    // === Setup Errors ===
    #[error("Setup failed: {0}")]
    Setup(String),

    // === Assertion Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    #[error("{} assertion(s) failed in '{group}':\n  - {}", .failures.len(), .failures.join("\n  - "))]
    AssertionGroup { group: String, failures: Vec<String> },

    // === Transport Errors ===
    #[error("{method} {url} failed: {source}")]
    Http {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a transport error for a failed request
    pub fn http(method: &reqwest::Method, url: &str, source: reqwest::Error) -> Self {
        Self::Http {
            method: method.to_string(),
            url: url.to_string(),
            source,
        }
    }

    /// Whether this error is an assertion failure rather than setup or transport
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::TestAssertion(_) | Self::AssertionGroup { .. })
    }
}
