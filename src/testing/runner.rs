//! Test runner implementation
//!
//! Authenticates once, then executes a scenario's steps strictly in order,
//! stopping at the first failing step.

use std::time::Instant;

use colored::Colorize;
use serde::Serialize;

use crate::auth::authenticate;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::data::TitleGenerator;
use crate::http::ApiClient;

use super::context::{ScenarioContext, ScenarioState};
use super::scenario::{Scenario, ScenarioStep};

/// Settings shared by every scenario in a run
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub config: Config,
    /// Seed for generated titles; random when absent
    pub seed: Option<u64>,
    pub verbose: bool,
    /// Tag output lines with the scenario name when scenarios interleave
    pub parallel: bool,
}

impl RunSettings {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    fn title_generator(&self) -> TitleGenerator {
        match self.seed {
            Some(seed) => TitleGenerator::seeded(seed),
            None => TitleGenerator::new(),
        }
    }
}

/// Result of a test run
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    /// Final state: `passed` or `failed`
    pub state: ScenarioState,
    /// Last state reached before the scenario ended
    pub reached: ScenarioState,
    /// `authenticate` for setup failures, otherwise the failing step's name
    pub failed_step: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Run one scenario against the configured API
///
/// Returns `Err` only when the run cannot start (e.g. the HTTP client cannot
/// be built); every failure after that is reported in the `TestResult`.
pub async fn run_scenario<S: Scenario>(scenario: &S, settings: &RunSettings) -> Result<TestResult> {
    let started = Instant::now();
    let steps = scenario.steps();
    let steps_total = steps.len();
    let tag = if settings.parallel {
        format!("[{}] ", scenario.name())
    } else {
        String::new()
    };

    println!(
        "\n{}{} {}",
        tag,
        "Running Test:".blue().bold(),
        scenario.name().white().bold()
    );
    println!("  {}{}", tag, scenario.description().dimmed());

    // Scoped to this run; dropped (connections released) on every return path
    let api = ApiClient::from_config(&settings.config)?;
    let mut ctx = ScenarioContext::new(settings.title_generator());

    let outcome = Outcome {
        name: scenario.name(),
        steps_total,
        started,
    };

    // Setup
    if settings.verbose {
        println!("\n{}{}", tag, "Setup:".cyan());
    }
    let credentials = &settings.config.credentials;
    match authenticate(&api, &settings.config.api.login_path, credentials).await {
        Ok(token) => {
            ctx.authenticated(token);
            if settings.verbose {
                println!(
                    "  {} {}authenticated as {}",
                    "✓".green(),
                    tag,
                    credentials.email.dimmed()
                );
            }
        }
        Err(e) => {
            println!("  {} {}Setup: {}", "✗".red(), tag, e);
            tracing::warn!(scenario = scenario.name(), error = %e, "Setup failed");
            let reached = ctx.state();
            ctx.fail();
            return Ok(outcome.failed(0, reached, "authenticate", e.to_string()));
        }
    }

    println!("\n{}{}", tag, "Steps:".cyan());

    for (i, step) in steps.iter().enumerate() {
        let step_num = i + 1;
        tracing::debug!(
            scenario = scenario.name(),
            step = step.name(),
            state = %ctx.state(),
            "Executing step"
        );

        match scenario.execute(*step, &api, &mut ctx).await {
            Ok(()) => {
                ctx.advance(step.reaches());
                println!(
                    "  {} {}Step {}: {}",
                    "✓".green(),
                    tag,
                    step_num,
                    step.name().dimmed()
                );
                if settings.verbose {
                    println!("      {}", ctx.summary().dimmed());
                }
            }
            Err(e) => {
                println!(
                    "  {} {}Step {}: {} [{}]: {}",
                    "✗".red(),
                    tag,
                    step_num,
                    step.name(),
                    failure_kind(&e),
                    e
                );
                tracing::warn!(
                    scenario = scenario.name(),
                    step = step.name(),
                    assertion = e.is_assertion(),
                    error = %e,
                    "Step failed"
                );
                let reached = ctx.state();
                ctx.fail();
                return Ok(outcome.failed(step_num, reached, step.name(), e.to_string()));
            }
        }
    }

    ctx.advance(ScenarioState::Passed);

    println!(
        "\n{} {}{}\n",
        "✓".green().bold(),
        tag,
        "Test Passed".green().bold()
    );
    tracing::info!(scenario = scenario.name(), steps = steps_total, "Scenario passed");

    Ok(outcome.passed())
}

/// Short label separating a failed check from a request that never completed
fn failure_kind(error: &Error) -> &'static str {
    if error.is_assertion() {
        "assertion"
    } else {
        match error {
            Error::Http { .. } => "transport",
            _ => "error",
        }
    }
}

struct Outcome {
    name: &'static str,
    steps_total: usize,
    started: Instant,
}

impl Outcome {
    fn passed(self) -> TestResult {
        TestResult {
            name: self.name.to_string(),
            passed: true,
            steps_run: self.steps_total,
            steps_total: self.steps_total,
            state: ScenarioState::Passed,
            reached: ScenarioState::Passed,
            failed_step: None,
            error: None,
            duration_ms: self.started.elapsed().as_millis() as u64,
        }
    }

    fn failed(self, steps_run: usize, reached: ScenarioState, step: &str, error: String) -> TestResult {
        TestResult {
            name: self.name.to_string(),
            passed: false,
            steps_run,
            steps_total: self.steps_total,
            state: ScenarioState::Failed,
            reached,
            failed_step: Some(step.to_string()),
            error: Some(error),
            duration_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}
