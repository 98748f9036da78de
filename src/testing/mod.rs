//! Scenario runner
//!
//! Each scenario is an explicit, ordered list of named steps sharing one
//! `ScenarioContext`. Steps run strictly in order and the first failure
//! ends the scenario.

mod context;
mod runner;
mod scenario;
pub mod scenarios;

pub use context::{ScenarioContext, ScenarioState};
pub use runner::{run_scenario, RunSettings, TestResult};
pub use scenario::{Scenario, ScenarioStep};
pub use scenarios::{BookLifecycle, CategoryLifecycle, ScenarioKind, ScenarioOutline};
