//! HTTP access to the bookstore API
//!
//! Wraps reqwest with the small surface the scenarios need.

pub mod client;

pub use client::{ApiClient, ApiResponse};
