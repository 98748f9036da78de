//! Request bodies sent to the bookstore API
//!
//! Responses are inspected as `serde_json::Value` so that a missing field is
//! reported by name instead of failing deserialization.

use serde::Serialize;

/// Body of `POST /users/login`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /category` and `PUT /category/{id}`
#[derive(Debug, Serialize)]
pub struct CategoryBody<'a> {
    pub title: &'a str,
}

/// Body of `POST /book`
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: f64,
    pub pages: u32,
    /// `_id` of an existing category
    pub category: String,
}

/// Partial body of `PUT /book/{id}`; absent fields are left untouched by the API
#[derive(Debug, Serialize, Default)]
pub struct BookUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// Server-assigned identifier field on every entity
pub const ID_FIELD: &str = "_id";
