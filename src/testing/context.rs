//! Per-run scenario state
//!
//! A `ScenarioContext` is created when a scenario starts, threaded through
//! every step by `&mut`, and dropped when the scenario ends. Nothing in it
//! is shared with other scenarios.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::common::{Error, Result};
use crate::data::TitleGenerator;

/// Lifecycle position of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    Init,
    Authenticated,
    HasEntity,
    Verified,
    Updated,
    Confirmed,
    Deleted,
    Passed,
    Failed,
}

impl ScenarioState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

impl fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Authenticated => "authenticated",
            Self::HasEntity => "has-entity",
            Self::Verified => "verified",
            Self::Updated => "updated",
            Self::Confirmed => "confirmed",
            Self::Deleted => "deleted",
            Self::Passed => "passed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Mutable state shared by the steps of one scenario run
#[derive(Debug)]
pub struct ScenarioContext {
    state: ScenarioState,
    token: Option<String>,
    entity_id: Option<String>,
    category_id: Option<String>,
    title: Option<String>,
    /// Field values sent to the API, kept for later comparison
    values: Map<String, Value>,
    titles: TitleGenerator,
}

impl ScenarioContext {
    pub fn new(titles: TitleGenerator) -> Self {
        Self {
            state: ScenarioState::Init,
            token: None,
            entity_id: None,
            category_id: None,
            title: None,
            values: Map::new(),
            titles,
        }
    }

    pub fn state(&self) -> ScenarioState {
        self.state
    }

    /// Move to `next`; once terminal the state no longer changes
    pub fn advance(&mut self, next: ScenarioState) {
        if self.state.is_terminal() {
            return;
        }
        if self.state != next {
            tracing::trace!(from = %self.state, to = %next, "Scenario state");
        }
        self.state = next;
    }

    pub fn fail(&mut self) {
        self.state = ScenarioState::Failed;
    }

    /// Store the bearer token and enter `Authenticated`
    pub fn authenticated(&mut self, token: String) {
        self.token = Some(token);
        self.advance(ScenarioState::Authenticated);
    }

    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| missing("bearer token"))
    }

    pub fn set_entity_id(&mut self, id: impl Into<String>) {
        self.entity_id = Some(id.into());
    }

    /// Identifier captured by the create step
    pub fn entity_id(&self) -> Result<&str> {
        self.entity_id.as_deref().ok_or_else(|| missing("entity id"))
    }

    pub fn set_category_id(&mut self, id: impl Into<String>) {
        self.category_id = Some(id.into());
    }

    /// Category referenced by the entity under test
    pub fn category_id(&self) -> Result<&str> {
        self.category_id
            .as_deref()
            .ok_or_else(|| missing("category id"))
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Result<&str> {
        self.title.as_deref().ok_or_else(|| missing("title"))
    }

    /// Generate a fresh `<prefix>_<n>` title and make it the current title
    pub fn next_title(&mut self, prefix: &str) -> String {
        let title = self.titles.title(prefix);
        self.title = Some(title.clone());
        title
    }

    /// Remember a value sent to the API
    pub fn record(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Remember every field of a serialized request body
    pub fn record_fields(&mut self, body: &Value) {
        if let Value::Object(fields) = body {
            for (key, value) in fields {
                self.values.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn recorded(&self, key: &str) -> Result<&Value> {
        self.values
            .get(key)
            .ok_or_else(|| missing(&format!("recorded value '{}'", key)))
    }

    /// One-line summary for verbose output
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("state={}", self.state)];
        if let Some(id) = &self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(id) = &self.category_id {
            parts.push(format!("category={}", id));
        }
        if let Some(title) = &self.title {
            parts.push(format!("title={}", title));
        }
        parts.join(" ")
    }
}

fn missing(what: &str) -> Error {
    Error::Internal(format!("no {} in scenario context; an earlier step must set it", what))
}
