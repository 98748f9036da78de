//! In-process fake of the bookstore API
//!
//! Behaves like the real service for the endpoints the scenarios touch:
//! a missing entity reads back as a literal `null`, books come back with
//! their category populated, and every mutating call needs a bearer token
//! issued by the login endpoint. `Faults` switches on specific misbehaviour.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

pub const EMAIL: &str = "john.doe@example.com";
pub const PASSWORD: &str = "password123";
pub const SEED_CATEGORY_ID: &str = "cat-seed-1";

/// Misbehaviour to inject
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Login always answers 401
    pub reject_login: bool,
    /// Login answers 200 with an empty token
    pub empty_token: bool,
    /// DELETE answers 200 but keeps the entity
    pub stale_delete: bool,
    /// PUT answers 200 with the old entity and changes nothing
    pub ignore_update: bool,
    /// Category listing leaves out categories created through the API
    pub hide_created_categories: bool,
    /// The seeded "The Great Gatsby" book is absent
    pub omit_seeded_book: bool,
    /// The seeded book has no author or description
    pub incomplete_seeded_book: bool,
    /// `GET /category/{id}` wraps the category in a one-item array
    pub category_as_list: bool,
}

#[derive(Default)]
struct Store {
    faults: Faults,
    next_id: u64,
    issued: Vec<String>,
    categories: Vec<Map<String, Value>>,
    books: Vec<Map<String, Value>>,
    requests: Vec<String>,
}

type Shared = Arc<Mutex<Store>>;

impl Store {
    fn seeded(faults: Faults) -> Self {
        let mut store = Store {
            faults,
            ..Default::default()
        };
        store.categories.push(object(json!({
            "_id": SEED_CATEGORY_ID,
            "title": "Fiction",
        })));
        if !store.faults.omit_seeded_book {
            let mut book = object(json!({
                "_id": "book-seed-1",
                "title": "The Great Gatsby",
                "author": "F. Scott Fitzgerald",
                "description": "A novel of the Jazz Age",
                "price": 10.99,
                "pages": 180,
                "category": SEED_CATEGORY_ID,
            }));
            if store.faults.incomplete_seeded_book {
                book.remove("author");
                book.insert("description".into(), json!(""));
            }
            store.books.push(book);
        }
        store
    }

    fn log(&mut self, line: String) {
        self.requests.push(line);
    }

    fn new_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{:04}", prefix, self.next_id)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| self.issued.iter().any(|t| t == token))
            .unwrap_or(false)
    }

    /// Book with its category id replaced by the category object
    fn populated(&self, book: &Map<String, Value>) -> Value {
        let mut book = book.clone();
        if let Some(Value::String(id)) = book.get("category").cloned() {
            let category = self
                .categories
                .iter()
                .find(|c| c.get("_id") == Some(&json!(id)))
                .map(|c| Value::Object(c.clone()))
                .unwrap_or(Value::Null);
            book.insert("category".into(), category);
        }
        Value::Object(book)
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn position(items: &[Map<String, Value>], id: &str) -> Option<usize> {
    items.iter().position(|item| item.get("_id") == Some(&json!(id)))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"}))).into_response()
}

/// Handle to a running fake; the server stops when this is dropped
pub struct FakeBookstore {
    pub base_url: String,
    store: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl FakeBookstore {
    pub async fn start() -> Self {
        Self::with_faults(Faults::default()).await
    }

    pub async fn with_faults(faults: Faults) -> Self {
        let store: Shared = Arc::new(Mutex::new(Store::seeded(faults)));
        let app = router(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake bookstore");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake bookstore server");
        });

        Self {
            base_url: format!("http://{}", addr),
            store,
            server,
        }
    }

    /// `"METHOD /path"` for every request received, in order
    pub fn requests(&self) -> Vec<String> {
        self.store.lock().unwrap().requests.clone()
    }

    pub fn logins(&self) -> usize {
        self.store.lock().unwrap().issued.len()
    }

    pub fn category_titles(&self) -> Vec<String> {
        let store = self.store.lock().unwrap();
        store
            .categories
            .iter()
            .filter_map(|c| c.get("title").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    pub fn book_ids(&self) -> Vec<String> {
        let store = self.store.lock().unwrap();
        store
            .books
            .iter()
            .filter_map(|b| b.get("_id").and_then(Value::as_str).map(str::to_string))
            .collect()
    }
}

impl Drop for FakeBookstore {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(store: Shared) -> Router {
    Router::new()
        .route("/users/login", post(login))
        .route("/category", get(list_categories).post(create_category))
        .route(
            "/category/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/book", get(list_books).post(create_book))
        .route(
            "/book/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

async fn login(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    store.log("POST /users/login".into());

    let valid = body["email"] == EMAIL && body["password"] == PASSWORD;
    if store.faults.reject_login || !valid {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response();
    }
    if store.faults.empty_token {
        return Json(json!({"token": ""})).into_response();
    }

    let token = format!("fake-token-{}", store.issued.len() + 1);
    store.issued.push(token.clone());
    Json(json!({"token": token})).into_response()
}

async fn list_categories(State(store): State<Shared>) -> Response {
    let mut store = store.lock().unwrap();
    store.log("GET /category".into());

    let hide = store.faults.hide_created_categories;
    let items: Vec<Value> = store
        .categories
        .iter()
        .filter(|c| !hide || c.get("_id") == Some(&json!(SEED_CATEGORY_ID)))
        .map(|c| Value::Object(c.clone()))
        .collect();
    Json(Value::Array(items)).into_response()
}

async fn create_category(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    store.log("POST /category".into());
    if !store.authorized(&headers) {
        return unauthorized();
    }

    let id = store.new_id("cat");
    let category = object(json!({"_id": id, "title": body["title"]}));
    store.categories.push(category.clone());
    Json(Value::Object(category)).into_response()
}

async fn get_category(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    let mut store = store.lock().unwrap();
    store.log(format!("GET /category/{}", id));

    match position(&store.categories, &id) {
        Some(i) if store.faults.category_as_list => {
            Json(json!([store.categories[i].clone()])).into_response()
        }
        Some(i) => Json(Value::Object(store.categories[i].clone())).into_response(),
        None => Json(Value::Null).into_response(),
    }
}

async fn update_category(
    State(store): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    store.log(format!("PUT /category/{}", id));
    if !store.authorized(&headers) {
        return unauthorized();
    }

    let ignore = store.faults.ignore_update;
    match position(&store.categories, &id) {
        Some(i) => {
            if !ignore {
                store.categories[i].insert("title".into(), body["title"].clone());
            }
            Json(Value::Object(store.categories[i].clone())).into_response()
        }
        None => Json(Value::Null).into_response(),
    }
}

async fn delete_category(
    State(store): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut store = store.lock().unwrap();
    store.log(format!("DELETE /category/{}", id));
    if !store.authorized(&headers) {
        return unauthorized();
    }

    match position(&store.categories, &id) {
        Some(i) if store.faults.stale_delete => {
            Json(Value::Object(store.categories[i].clone())).into_response()
        }
        Some(i) => Json(Value::Object(store.categories.remove(i))).into_response(),
        None => Json(Value::Null).into_response(),
    }
}

async fn list_books(State(store): State<Shared>) -> Response {
    let mut store = store.lock().unwrap();
    store.log("GET /book".into());

    let items: Vec<Value> = store.books.iter().map(|b| store.populated(b)).collect();
    Json(Value::Array(items)).into_response()
}

async fn create_book(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    store.log("POST /book".into());
    if !store.authorized(&headers) {
        return unauthorized();
    }

    let id = store.new_id("book");
    let mut book = object(body);
    book.insert("_id".into(), json!(id));
    store.books.push(book.clone());
    Json(Value::Object(book)).into_response()
}

async fn get_book(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    let mut store = store.lock().unwrap();
    store.log(format!("GET /book/{}", id));

    match position(&store.books, &id) {
        Some(i) => Json(store.populated(&store.books[i])).into_response(),
        None => Json(Value::Null).into_response(),
    }
}

async fn update_book(
    State(store): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    store.log(format!("PUT /book/{}", id));
    if !store.authorized(&headers) {
        return unauthorized();
    }

    let ignore = store.faults.ignore_update;
    match position(&store.books, &id) {
        Some(i) => {
            if !ignore {
                for (key, value) in object(body) {
                    store.books[i].insert(key, value);
                }
            }
            Json(store.populated(&store.books[i])).into_response()
        }
        None => Json(Value::Null).into_response(),
    }
}

async fn delete_book(
    State(store): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut store = store.lock().unwrap();
    store.log(format!("DELETE /book/{}", id));
    if !store.authorized(&headers) {
        return unauthorized();
    }

    match position(&store.books, &id) {
        Some(i) if store.faults.stale_delete => Json(store.populated(&store.books[i])).into_response(),
        Some(i) => Json(Value::Object(store.books.remove(i))).into_response(),
        None => Json(Value::Null).into_response(),
    }
}
