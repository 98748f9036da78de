//! Bearer-token acquisition
//!
//! Every scenario logs in once before its first step. Tokens are never
//! shared between scenario runs.

use serde_json::Value;

use crate::common::config::Credentials;
use crate::common::{Error, Result};
use crate::http::ApiClient;
use crate::model::LoginRequest;

/// Exchange credentials for a non-empty bearer token
///
/// Any failure here is a setup failure: the caller must not run steps.
pub async fn authenticate(
    api: &ApiClient,
    login_path: &str,
    credentials: &Credentials,
) -> Result<String> {
    let body = LoginRequest {
        email: &credentials.email,
        password: &credentials.password,
    };

    let response = api.post(login_path, None, &body).await?;

    if !response.status.is_success() {
        return Err(Error::Setup(format!(
            "Login as '{}' was rejected: {}",
            credentials.email,
            response.describe()
        )));
    }

    let token = extract_token(&response.body)?;
    tracing::debug!(email = %credentials.email, "Authenticated");
    Ok(token)
}

/// Pull the token out of a login response body
///
/// Accepts a JSON string, an object with `token`/`accessToken`/`access_token`,
/// or plain text.
pub fn extract_token(body: &str) -> Result<String> {
    let token = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(token)) => token,
        Ok(Value::Object(map)) => ["token", "accessToken", "access_token"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .ok_or_else(|| {
                let keys: Vec<&String> = map.keys().collect();
                Error::Setup(format!(
                    "Login response has no token field. Fields: {:?}",
                    keys
                ))
            })?,
        Ok(Value::Null) => String::new(),
        Ok(other) => {
            return Err(Error::Setup(format!(
                "Unexpected login response: {}",
                other
            )))
        }
        Err(_) => body.to_string(),
    };

    let token = token.trim().trim_matches('"').trim();
    if token.is_empty() {
        return Err(Error::Setup(
            "Authentication token should not be null or empty".to_string(),
        ));
    }
    Ok(token.to_string())
}
