//! Book lifecycle
//!
//! Checks the catalogue and a seeded book, then creates a book under an
//! existing category and walks it through update and delete. The category
//! is borrowed from the environment, not created here, so at least one
//! category must already exist.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::assertions::{
    absence_marker, body_not_empty, contains, field_equals, field_present, is_array, is_object,
    non_empty_str, not_empty_list, status_is, string_field_not_empty, where_str, AssertionGroup,
};
use crate::common::config::{BookTemplate, Fixtures};
use crate::common::{Error, Result};
use crate::http::{ApiClient, ApiResponse};
use crate::model::{BookUpdate, NewBook, ID_FIELD};
use crate::testing::context::{ScenarioContext, ScenarioState};
use crate::testing::scenario::{Scenario, ScenarioStep};

use super::category::CATEGORY_PATH;
use super::item_path;

pub const BOOK_PATH: &str = "/book";

/// Author the update step assigns
pub const UPDATED_AUTHOR: &str = "Updated Author";

/// Fields compared after create, in report order
const CREATED_FIELDS: &[&str] = &["title", "author", "description", "price", "pages"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStep {
    ListAll,
    FindSeeded,
    ResolveCategory,
    Create,
    VerifyCreated,
    ListContains,
    Update,
    VerifyUpdated,
    Delete,
    VerifyDeleted,
}

const STEPS: &[BookStep] = &[
    BookStep::ListAll,
    BookStep::FindSeeded,
    BookStep::ResolveCategory,
    BookStep::Create,
    BookStep::VerifyCreated,
    BookStep::ListContains,
    BookStep::Update,
    BookStep::VerifyUpdated,
    BookStep::Delete,
    BookStep::VerifyDeleted,
];

impl ScenarioStep for BookStep {
    fn name(&self) -> &'static str {
        match self {
            Self::ListAll => "list-all",
            Self::FindSeeded => "find-seeded",
            Self::ResolveCategory => "resolve-category",
            Self::Create => "create",
            Self::VerifyCreated => "verify-created",
            Self::ListContains => "list-contains",
            Self::Update => "update",
            Self::VerifyUpdated => "verify-updated",
            Self::Delete => "delete",
            Self::VerifyDeleted => "verify-deleted",
        }
    }

    fn reaches(&self) -> ScenarioState {
        match self {
            Self::ListAll | Self::FindSeeded | Self::ResolveCategory => {
                ScenarioState::Authenticated
            }
            Self::Create | Self::VerifyCreated => ScenarioState::HasEntity,
            Self::ListContains => ScenarioState::Verified,
            Self::Update => ScenarioState::Updated,
            Self::VerifyUpdated => ScenarioState::Confirmed,
            Self::Delete => ScenarioState::Deleted,
            Self::VerifyDeleted => ScenarioState::Passed,
        }
    }
}

pub struct BookLifecycle {
    prefix: String,
    seeded_title: String,
    seeded_author: String,
    template: BookTemplate,
}

impl BookLifecycle {
    pub fn new(fixtures: &Fixtures, template: &BookTemplate) -> Self {
        Self {
            prefix: fixtures.book_prefix.clone(),
            seeded_title: fixtures.seeded_book_title.clone(),
            seeded_author: fixtures.seeded_book_author.clone(),
            template: template.clone(),
        }
    }

    /// Title the update step renames a book to
    pub fn updated_title(title: &str) -> String {
        format!("{}Updated Book Title", title)
    }

    fn new_book(&self, title: String, category: &str) -> NewBook {
        NewBook {
            title,
            author: self.template.author.clone(),
            description: self.template.description.clone(),
            price: self.template.price,
            pages: self.template.pages,
            category: category.to_string(),
        }
    }
}

#[async_trait]
impl Scenario for BookLifecycle {
    type Step = BookStep;

    fn name(&self) -> &'static str {
        "book-lifecycle"
    }

    fn description(&self) -> &'static str {
        "Validate the catalogue, then create, update and delete a book under an existing category"
    }

    fn steps(&self) -> &'static [BookStep] {
        STEPS
    }

    async fn execute(&self, step: BookStep, api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
        match step {
            BookStep::ListAll => list_all(api).await,
            BookStep::FindSeeded => self.find_seeded(api).await,
            BookStep::ResolveCategory => resolve_category(api, ctx).await,
            BookStep::Create => self.create(api, ctx).await,
            BookStep::VerifyCreated => verify_created(api, ctx).await,
            BookStep::ListContains => list_contains(api, ctx).await,
            BookStep::Update => update(api, ctx).await,
            BookStep::VerifyUpdated => verify_updated(api, ctx).await,
            BookStep::Delete => delete(api, ctx).await,
            BookStep::VerifyDeleted => verify_deleted(api, ctx).await,
        }
    }
}

/// Status, body and array checks shared by every listing; yields the items
fn listing(group: &mut AssertionGroup, response: &ApiResponse) -> Option<Vec<Value>> {
    group.check(status_is(response, StatusCode::OK, "Response does not have correct status code"));
    group.check(body_not_empty(response, "Response content is not as expected"));
    let body = group.check(response.json())?;
    group
        .check(is_array(&body, "The response content is not an array"))
        .cloned()
}

async fn list_all(api: &ApiClient) -> Result<()> {
    let response = api.get(BOOK_PATH, None).await?;

    let mut group = AssertionGroup::new("list books");
    if let Some(books) = listing(&mut group, &response) {
        group.check(not_empty_list(&books, "Books count is below 1"));
        for (i, book) in books.iter().enumerate() {
            let n = i + 1;
            for key in ["title", "author", "description"] {
                group.check(string_field_not_empty(
                    book,
                    key,
                    &format!("Book #{} {} is not as expected", n, key),
                ));
            }
            for key in ["price", "pages", "category"] {
                group.check(field_present(
                    book,
                    key,
                    &format!("Book #{} {} is not as expected", n, key),
                ));
            }
        }
    }
    group.finish()
}

impl BookLifecycle {
    async fn find_seeded(&self, api: &ApiClient) -> Result<()> {
        let response = api.get(BOOK_PATH, None).await?;

        let mut group = AssertionGroup::new("find seeded book");
        if let Some(books) = listing(&mut group, &response) {
            let found = group.check(contains(
                &books,
                where_str("title", &self.seeded_title),
                &format!("Book with title {} does not exist", self.seeded_title),
            ));
            if let Some(book) = found {
                group.check(field_equals(
                    book,
                    "author",
                    self.seeded_author.as_str(),
                    "Author is not as expected",
                ));
            }
        }
        group.finish()
    }

    async fn create(&self, api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
        let title = ctx.next_title(&self.prefix);
        let book = self.new_book(title, ctx.category_id()?);
        let body = serde_json::to_value(&book)?;

        let response = api.post(BOOK_PATH, Some(ctx.token()?), &body).await?;

        let mut group = AssertionGroup::new("create book");
        group.check(status_is(&response, StatusCode::OK, "Status code is not as expected"));
        group.check(body_not_empty(&response, "Response content is not as expected"));
        group.finish()?;

        let created = response.json()?;
        let id = non_empty_str(&created, ID_FIELD, "Book id is not as expected")?;

        tracing::info!(id, title = %book.title, category = %book.category, "Created book");
        ctx.set_entity_id(id);
        ctx.record_fields(&body);
        Ok(())
    }
}

async fn resolve_category(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let response = api.get(CATEGORY_PATH, None).await?;

    let mut group = AssertionGroup::new("get categories");
    group.check(status_is(&response, StatusCode::OK, "Get categories status code is not as expected"));
    group.check(body_not_empty(&response, "Response content is not as expected"));
    group.finish()?;

    let body = response.json()?;
    let categories = is_array(&body, "Categories response is not an array")?;
    let first = categories.first().ok_or_else(|| {
        Error::TestAssertion("No category exists to reference from a new book".to_string())
    })?;
    let id = non_empty_str(first, ID_FIELD, "First category id is not as expected")?;

    tracing::debug!(category = id, "Resolved category");
    ctx.set_category_id(id);
    Ok(())
}

async fn verify_created(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let response = api.get(&item_path(BOOK_PATH, ctx.entity_id()?), None).await?;

    let mut group = AssertionGroup::new("verify created book");
    group.check(status_is(&response, StatusCode::OK, "Status code is not as expected"));
    group.check(body_not_empty(&response, "Response content is not as expected"));
    if let Some(book) = group.check(response.json()) {
        group.check(is_object(&book, "Book response type is not as expected"));
        for key in CREATED_FIELDS {
            let expected = ctx.recorded(key)?.clone();
            group.check(field_equals(
                &book,
                key,
                expected,
                &format!("New book {} is not as expected", key),
            ));
        }
        group.check(field_equals(
            &book,
            "/category/_id",
            ctx.category_id()?,
            "Category id is not as expected",
        ));
    }
    group.finish()
}

async fn list_contains(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let response = api.get(BOOK_PATH, None).await?;
    let title = ctx.title()?;
    let id = ctx.entity_id()?;

    let mut group = AssertionGroup::new("find created book");
    if let Some(books) = listing(&mut group, &response) {
        let found = group.check(contains(
            &books,
            where_str("title", title),
            &format!("Book with title {} does not exist", title),
        ));
        if let Some(book) = found {
            group.check(field_equals(book, ID_FIELD, id, "Listed book id is not as expected"));
        }
    }
    group.finish()
}

async fn update(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let path = item_path(BOOK_PATH, ctx.entity_id()?);
    let title = BookLifecycle::updated_title(ctx.title()?);
    let changes = BookUpdate {
        title: Some(title.as_str()),
        author: Some(UPDATED_AUTHOR),
        ..Default::default()
    };

    let response = api.put(&path, Some(ctx.token()?), &changes).await?;

    let mut group = AssertionGroup::new("update book");
    group.check(status_is(
        &response,
        StatusCode::OK,
        "The response does not have the correct status code",
    ));
    group.check(body_not_empty(&response, "Response content is not as expected"));
    if let Some(updated) = group.check(response.json()) {
        group.check(field_equals(&updated, "title", title.as_str(), "Updated title is not as expected"));
        group.check(field_equals(&updated, "author", UPDATED_AUTHOR, "Updated author is not as expected"));
    }
    group.finish()?;

    ctx.record("title", title.as_str());
    ctx.record("author", UPDATED_AUTHOR);
    ctx.set_title(title);
    Ok(())
}

async fn verify_updated(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let response = api.get(&item_path(BOOK_PATH, ctx.entity_id()?), None).await?;

    status_is(&response, StatusCode::OK, "Status code is not as expected")?;
    let book = response.json()?;
    is_object(&book, "Book response type is not as expected")?;

    let mut group = AssertionGroup::new("verify updated book");
    for key in ["title", "author", "description"] {
        let expected = ctx.recorded(key)?.clone();
        group.check(field_equals(
            &book,
            key,
            expected,
            &format!("Book {} after update is not as expected", key),
        ));
    }
    group.finish()
}

async fn delete(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let path = item_path(BOOK_PATH, ctx.entity_id()?);
    let response = api.delete(&path, Some(ctx.token()?)).await?;
    status_is(&response, StatusCode::OK, "Status code is not as expected")
}

async fn verify_deleted(api: &ApiClient, ctx: &mut ScenarioContext) -> Result<()> {
    let response = api.get(&item_path(BOOK_PATH, ctx.entity_id()?), None).await?;
    absence_marker(&response, "Deleted book is still readable")
}
