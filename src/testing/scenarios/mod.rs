//! Built-in scenarios

pub mod book;
pub mod category;

use clap::ValueEnum;
use serde::Serialize;

use crate::common::Result;

use super::runner::{run_scenario, RunSettings, TestResult};
use super::scenario::{Scenario, ScenarioStep};

pub use book::BookLifecycle;
pub use category::CategoryLifecycle;

/// Selectable scenario families
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioKind {
    Category,
    Book,
}

impl ScenarioKind {
    pub fn all() -> &'static [ScenarioKind] {
        &[ScenarioKind::Category, ScenarioKind::Book]
    }

    /// Run this scenario with its settings taken from `settings.config`
    pub async fn run(self, settings: &RunSettings) -> Result<TestResult> {
        let config = &settings.config;
        match self {
            Self::Category => run_scenario(&CategoryLifecycle::new(&config.fixtures), settings).await,
            Self::Book => {
                run_scenario(&BookLifecycle::new(&config.fixtures, &config.book), settings).await
            }
        }
    }

    /// Name, description and ordered step names, without running anything
    pub fn outline(self, settings: &RunSettings) -> ScenarioOutline {
        let config = &settings.config;
        match self {
            Self::Category => outline_of(&CategoryLifecycle::new(&config.fixtures)),
            Self::Book => outline_of(&BookLifecycle::new(&config.fixtures, &config.book)),
        }
    }
}

/// Static description of a scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutline {
    pub name: &'static str,
    pub description: &'static str,
    pub steps: Vec<&'static str>,
}

fn outline_of<S: Scenario>(scenario: &S) -> ScenarioOutline {
    ScenarioOutline {
        name: scenario.name(),
        description: scenario.description(),
        steps: scenario.steps().iter().map(|s| s.name()).collect(),
    }
}

/// `<collection>/<id>`
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, id)
}
