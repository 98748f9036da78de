//! Response assertions
//!
//! Every check returns `Result`, so a lone check used with `?` aborts the
//! step at the first failure. Wrapping checks in an [`AssertionGroup`]
//! evaluates all of them and reports the failures together.

use reqwest::StatusCode;
use serde_json::Value;

use crate::common::{Error, Result};
use crate::http::ApiResponse;

/// Assert the response status
pub fn status_is(response: &ApiResponse, expected: StatusCode, description: &str) -> Result<()> {
    if response.status != expected {
        return Err(Error::TestAssertion(format!(
            "{}: expected status {}, got {} ({} {})",
            description,
            expected.as_u16(),
            response.status.as_u16(),
            response.method,
            response.url
        )));
    }
    Ok(())
}

/// Assert an optional string is present and not empty
pub fn not_empty(value: Option<&str>, description: &str) -> Result<()> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(Error::TestAssertion(format!(
            "{}: expected a non-empty value, got an empty string",
            description
        ))),
        None => Err(Error::TestAssertion(format!(
            "{}: expected a non-empty value, got null",
            description
        ))),
    }
}

/// Assert the response carries a body
pub fn body_not_empty(response: &ApiResponse, description: &str) -> Result<()> {
    not_empty(Some(&response.body), description)
}

/// Look up a field by name or JSON pointer (`"title"`, `"/category/_id"`)
pub fn field<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.starts_with('/') {
        value.pointer(path)
    } else {
        value.get(path)
    }
}

/// String value of a field, if it is a string
pub fn str_field<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    field(value, path).and_then(Value::as_str)
}

/// Assert a field is a non-empty string and return it
pub fn non_empty_str<'a>(value: &'a Value, path: &str, description: &str) -> Result<&'a str> {
    let found = str_field(value, path);
    not_empty(found, description)?;
    Ok(found.unwrap_or_default())
}

/// Assert a field exists, is not null, and is not an empty string
pub fn field_present(value: &Value, path: &str, description: &str) -> Result<()> {
    match field(value, path) {
        None | Some(Value::Null) => Err(Error::TestAssertion(format!(
            "{}: field '{}' is missing",
            description, path
        ))),
        Some(Value::String(s)) if s.trim().is_empty() => Err(Error::TestAssertion(format!(
            "{}: field '{}' is empty",
            description, path
        ))),
        Some(_) => Ok(()),
    }
}

/// Assert a field holds a non-empty string
pub fn string_field_not_empty(value: &Value, path: &str, description: &str) -> Result<()> {
    match field(value, path) {
        Some(Value::String(_)) | None | Some(Value::Null) => {
            not_empty(str_field(value, path), description)
        }
        Some(other) => Err(Error::TestAssertion(format!(
            "{}: field '{}' should be a string, got {}",
            description, path, other
        ))),
    }
}

/// Assert a field equals an expected JSON value
///
/// Numbers compare by numeric value, so `50` matches `50.0`.
pub fn field_equals(
    value: &Value,
    path: &str,
    expected: impl Into<Value>,
    description: &str,
) -> Result<()> {
    let expected = expected.into();
    match field(value, path) {
        Some(actual) if values_match(actual, &expected) => Ok(()),
        Some(actual) => Err(Error::TestAssertion(format!(
            "{}: expected {} = {}, got {}",
            description, path, expected, actual
        ))),
        None => Err(Error::TestAssertion(format!(
            "{}: expected {} = {}, but the field is missing",
            description, path, expected
        ))),
    }
}

fn values_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}

/// Assert the value is a JSON array and return its items
pub fn is_array<'a>(value: &'a Value, description: &str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        Error::TestAssertion(format!(
            "{}: expected an array, got {}",
            description,
            json_type(value)
        ))
    })
}

/// Assert the value is a JSON object
pub fn is_object(value: &Value, description: &str) -> Result<()> {
    if !value.is_object() {
        return Err(Error::TestAssertion(format!(
            "{}: expected an object, got {}",
            description,
            json_type(value)
        )));
    }
    Ok(())
}

/// Assert a list has at least one item
pub fn not_empty_list<T>(items: &[T], description: &str) -> Result<()> {
    if items.is_empty() {
        return Err(Error::TestAssertion(format!(
            "{}: expected at least 1 item, got 0",
            description
        )));
    }
    Ok(())
}

/// Assert some item matches `predicate` and return the first match
pub fn contains<'a, F>(items: &'a [Value], predicate: F, description: &str) -> Result<&'a Value>
where
    F: Fn(&Value) -> bool,
{
    items.iter().find(|item| predicate(*item)).ok_or_else(|| {
        Error::TestAssertion(format!(
            "{}: no matching item among {} item(s)",
            description,
            items.len()
        ))
    })
}

/// Predicate matching items whose string field equals `expected`
pub fn where_str<'e>(path: &'e str, expected: &'e str) -> impl Fn(&Value) -> bool + 'e {
    move |item: &Value| str_field(item, path) == Some(expected)
}

/// Assert the response signals a missing resource with a literal `null` body
pub fn absence_marker(response: &ApiResponse, description: &str) -> Result<()> {
    if !response.is_absence_marker() {
        let mut shown: String = response.body.chars().take(200).collect();
        if shown.len() < response.body.len() {
            shown.push_str("...");
        }
        return Err(Error::TestAssertion(format!(
            "{}: expected body \"null\", got {:?} (status {})",
            description,
            shown,
            response.status.as_u16()
        )));
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Result of one check inside a group
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionOutcome {
    /// Position of the check within the group, starting at 1
    pub index: usize,
    pub passed: bool,
    pub message: Option<String>,
}

/// Soft assertion batch: every check runs, failures surface together in `finish`
#[derive(Debug)]
pub struct AssertionGroup {
    name: String,
    outcomes: Vec<AssertionOutcome>,
}

impl AssertionGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Vec::new(),
        }
    }

    /// Record a check; its value is returned on success so dependent checks can use it
    pub fn check<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.record(true, None);
                Some(value)
            }
            // Nested groups contribute each of their failures
            Err(Error::AssertionGroup { failures, .. }) => {
                for failure in failures {
                    self.record(false, Some(failure));
                }
                None
            }
            Err(Error::TestAssertion(message)) => {
                self.record(false, Some(message));
                None
            }
            Err(other) => {
                self.record(false, Some(other.to_string()));
                None
            }
        }
    }

    fn record(&mut self, passed: bool, message: Option<String>) {
        let index = self.outcomes.len() + 1;
        self.outcomes.push(AssertionOutcome {
            index,
            passed,
            message,
        });
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }

    /// Close the group, failing with every recorded failure if there were any
    pub fn finish(self) -> Result<()> {
        let failures: Vec<String> = self
            .outcomes
            .iter()
            .filter(|o| !o.passed)
            .filter_map(|o| o.message.clone())
            .collect();

        tracing::debug!(
            group = %self.name,
            checks = self.outcomes.len(),
            failed = self.failure_count(),
            "Assertion group finished"
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::AssertionGroup {
                group: self.name,
                failures,
            })
        }
    }
}
