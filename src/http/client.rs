//! Thin HTTP client for the bookstore API
//!
//! One call per verb, optional bearer token, optional JSON body. Non-2xx
//! responses are returned as ordinary values; only transport failures are
//! errors.

use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::common::config::Config;
use crate::common::{Error, Result};

/// A completed request/response pair
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub method: Method,
    pub url: String,
    pub status: StatusCode,
    /// Raw response text
    pub body: String,
}

impl ApiResponse {
    /// Parse the raw body as JSON
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Whether the body is the literal `null` this API returns for a missing resource
    pub fn is_absence_marker(&self) -> bool {
        self.body == "null"
    }

    /// Short human-readable form, e.g. `GET http://host/book -> 200 OK`
    pub fn describe(&self) -> String {
        format!("{} {} -> {}", self.method, self.url, self.status)
    }
}

/// HTTP client bound to one base URL
///
/// Owns a `reqwest::Client` and its connection pool; dropping the client
/// releases the connections.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bookstore-api-tests/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the `[api]` and `[timeouts]` config sections
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api.base_url,
            Duration::from_secs(config.timeouts.request_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path against the base URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<ApiResponse> {
        self.execute(Method::GET, path, token, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, token, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<ApiResponse> {
        self.execute(Method::DELETE, path, token, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        let url = self.url(path);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| Error::http(&method, &url, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(&method, &url, e))?;

        tracing::debug!(
            %method,
            %url,
            status = status.as_u16(),
            authorized = token.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = text.len(),
            "HTTP exchange"
        );
        tracing::trace!(request = ?body, response = %text, "HTTP bodies");

        Ok(ApiResponse {
            method,
            url,
            status,
            body: text,
        })
    }
}
