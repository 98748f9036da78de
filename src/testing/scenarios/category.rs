//! Category lifecycle: create, list, update, re-read, delete, confirm gone

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::assertions::{
    absence_marker, body_not_empty, contains, field_equals, is_array, is_object, non_empty_str,
    not_empty_list, status_is, where_str, AssertionGroup,
};
use crate::common::config::Fixtures;
use crate::common::Result;
use crate::http::ApiClient;
use crate::model::{CategoryBody, ID_FIELD};
use crate::testing::context::{ScenarioContext, ScenarioState};
use crate::testing::scenario::{Scenario, ScenarioStep};

use super::item_path;

pub const CATEGORY_PATH: &str = "/category";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStep {
    Create,
    ListContains,
    Update,
    VerifyUpdated,
    Delete,
    VerifyDeleted,
}

const STEPS: &[CategoryStep] = &[
    CategoryStep::Create,
    CategoryStep::ListContains,
    CategoryStep::Update,
    CategoryStep::VerifyUpdated,
    CategoryStep::Delete,
    CategoryStep::VerifyDeleted,
];

impl ScenarioStep for CategoryStep {
    fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ListContains => "list-contains",
            Self::Update => "update",
            Self::VerifyUpdated => "verify-updated",
            Self::Delete => "delete",
            Self::VerifyDeleted => "verify-deleted",
        }
    }

    fn reaches(&self) -> ScenarioState {
        match self {
            Self::Create => ScenarioState::HasEntity,
            Self::ListContains => ScenarioState::Verified,
            Self::Update => ScenarioState::Updated,
            Self::VerifyUpdated => ScenarioState::Confirmed,
            Self::Delete => ScenarioState::Deleted,
            Self::VerifyDeleted => ScenarioState::Passed,
        }
    }
}

/// Full create-to-delete walk over one freshly created category
pub struct CategoryLifecycle {
    prefix: String,
}

impl CategoryLifecycle {
    pub fn new(fixtures: &Fixtures) -> Self {
        Self {
            prefix: fixtures.category_prefix.clone(),
        }
    }

    /// Title the update step renames a category to
    pub fn updated_title(title: &str) -> String {
        format!("{}_updated", title)
    }
}

#[async_trait]
impl Scenario for CategoryLifecycle {
    type Step = CategoryStep;

    fn name(&self) -> &'static str {
        "category-lifecycle"
    }

    fn description(&self) -> &'static str {
        "Create a category, find it in the listing, rename it, delete it"
    }

    fn steps(&self) -> &'static [CategoryStep] {
        STEPS
    }

    async fn execute(
        &self,
        step: CategoryStep,
        api: &ApiClient,
        ctx: &mut ScenarioContext,
    ) -> Result<()> {
        match step {
            CategoryStep::Create => create(api, ctx, &self.prefix).await,
            CategoryStep::ListContains => list_contains(api, ctx).await,
            CategoryStep::Update => update(api, ctx).await,
            CategoryStep::VerifyUpdated => verify_updated(api, ctx).await,
            CategoryStep::Delete => delete(api, ctx).await,
            CategoryStep::VerifyDeleted => verify_deleted(api, ctx).await,
        }
    }
}

async fn create(api: &ApiClient, ctx: &mut ScenarioContext, prefix: &str) -> Result<()> {
    let title = ctx.next_title(prefix);
    let response = api
        .post(CATEGORY_PATH, Some(ctx.token()?), &CategoryBody { title: &title })
        .await?;

    status_is(&response, StatusCode::OK, "Status code is not as expected")?;
    let created = response.json()?;
    let id = non_empty_str(&created, ID_FIELD, "Category id is not as expected")?;

    tracing::info!(id, title = %title, "Created category");
    ctx.set_entity_id(id);
    Ok(())
}

async fn list_contains(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let id = ctx.entity_id()?;
    let response = api.get(CATEGORY_PATH, None).await?;

    let mut group = AssertionGroup::new("list categories");
    group.check(status_is(&response, StatusCode::OK, "Status code is not as expected"));
    group.check(body_not_empty(&response, "Response content is not as expected"));
    if let Some(body) = group.check(response.json()) {
        if let Some(categories) = group.check(is_array(&body, "Response type is not as expected")) {
            group.check(not_empty_list(categories, "Categories count is less than 1"));
            group.check(contains(
                categories,
                where_str(ID_FIELD, id),
                "Created category is not in the listing",
            ));
        }
    }
    group.finish()
}

async fn update(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let path = item_path(CATEGORY_PATH, ctx.entity_id()?);
    let title = CategoryLifecycle::updated_title(ctx.title()?);

    let response = api
        .put(&path, Some(ctx.token()?), &CategoryBody { title: &title })
        .await?;
    status_is(&response, StatusCode::OK, "Update status code is not as expected")?;

    ctx.set_title(title);
    Ok(())
}

async fn verify_updated(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let response = api.get(&item_path(CATEGORY_PATH, ctx.entity_id()?), None).await?;

    status_is(&response, StatusCode::OK, "Status code is not as expected")?;
    body_not_empty(&response, "Response content is not as expected")?;
    let category = response.json()?;
    is_object(&category, "Category response type is not as expected")?;
    field_equals(&category, "title", ctx.title()?, "Category title was not updated")
}

async fn delete(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let path = item_path(CATEGORY_PATH, ctx.entity_id()?);
    let response = api.delete(&path, Some(ctx.token()?)).await?;
    status_is(&response, StatusCode::OK, "Delete status code is not as expected")
}

async fn verify_deleted(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let response = api.get(&item_path(CATEGORY_PATH, ctx.entity_id()?), None).await?;
    absence_marker(&response, "Deleted category is still readable")
}
