//! Scenario definition traits

use async_trait::async_trait;

use crate::common::Result;
use crate::http::ApiClient;

use super::context::{ScenarioContext, ScenarioState};

/// One named step of a scenario
pub trait ScenarioStep: Copy + Send + Sync + 'static {
    /// Short kebab-case name shown in output
    fn name(&self) -> &'static str;

    /// State the scenario is in once this step passes
    fn reaches(&self) -> ScenarioState;
}

/// A fixed, ordered sequence of steps over one entity lifecycle
#[async_trait]
pub trait Scenario: Send + Sync {
    type Step: ScenarioStep;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Steps in execution order
    fn steps(&self) -> &'static [Self::Step];

    /// Run a single step; any `Err` fails the scenario
    async fn execute(
        &self,
        step: Self::Step,
        api: &ApiClient,
        ctx: &mut ScenarioContext,
    ) -> Result<()>;
}
