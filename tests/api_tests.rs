//! API tests, run against the in-memory store

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use bson::Document;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use lms_server::{
    api,
    repository::Repository,
    services::Services,
    store::{Connector, MemoryStore, RecordStore, StoreError, StoreResult},
    AppState,
};

/// A store whose server never answers
struct UnreachableStore;

#[async_trait]
impl RecordStore for UnreachableStore {
    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Connection("server selection timeout".to_string()))
    }

    async fn ensure_unique_index(&self, _: &str, _: &str) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_many(&self, _: &str, _: Vec<Document>) -> StoreResult<()> {
        Err(StoreError::Connection("server selection timeout".to_string()))
    }

    async fn find(&self, _: &str, _: Document) -> StoreResult<Vec<Document>> {
        Err(StoreError::Connection("server selection timeout".to_string()))
    }
}

async fn app_with(store: Arc<dyn RecordStore>, connector: Connector) -> Router {
    let repository = Repository::new(store);
    repository.ensure_indexes().await.unwrap();

    let state = AppState {
        services: Arc::new(Services::new(repository)),
        connection: connector.monitor(),
    };
    api::create_router(state)
}

async fn test_app() -> Router {
    app_with(Arc::new(MemoryStore::new()), Connector::connected()).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

fn book(id: i64, genre: &str, year: i32, available: bool) -> Value {
    json!({
        "bookID": id,
        "title": format!("Book {}", id),
        "author": "Test Author",
        "genre": genre,
        "publishedYear": year,
        "isAvailable": available
    })
}

fn member(id: i64, email: &str, role: &str) -> Value {
    json!({
        "memberID": id,
        "name": format!("Member {}", id),
        "email": email,
        "role": role
    })
}

fn book_ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|b| b["bookID"].as_i64().unwrap())
        .collect()
}

fn member_ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|m| m["memberID"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_book_applies_defaults() {
    let app = test_app().await;

    let (status, body) = post(
        &app,
        "/lms/books",
        json!({
            "bookID": 1,
            "title": "A Brief History of Time",
            "author": "Stephen Hawking",
            "genre": "Science",
            "publishedYear": 1988
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bookID"], 1);
    assert_eq!(body["title"], "A Brief History of Time");
    assert_eq!(body["author"], "Stephen Hawking");
    assert_eq!(body["genre"], "Science");
    assert_eq!(body["publishedYear"], 1988);
    assert_eq!(body["isAvailable"], true);
    assert_eq!(body["_id"].as_str().unwrap().len(), 24);
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_books_batch() {
    let app = test_app().await;

    let (status, body) = post(
        &app,
        "/lms/books",
        json!([book(1, "Fiction", 2001, true), book(2, "Comics", 2010, false)]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book_ids(&body), vec![1, 2]);

    let (status, body) = get(&app, "/lms/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book_ids(&body["books"]), vec![1, 2]);
}

#[tokio::test]
async fn test_create_member_applies_defaults() {
    let app = test_app().await;

    let (status, body) = post(
        &app,
        "/lms/members",
        json!({
            "memberID": 10,
            "name": "Marie Curie",
            "email": "marie@lib.org",
            "department": "Physics",
            "role": "faculty",
            "gender": "female"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["memberID"], 10);
    assert_eq!(body["name"], "Marie Curie");
    assert_eq!(body["email"], "marie@lib.org");
    assert_eq!(body["department"], "Physics");
    assert_eq!(body["role"], "faculty");
    assert_eq!(body["gender"], "female");
    assert_eq!(body["isActive"], true);
    assert!(body["joinedDate"].is_string());
}

#[tokio::test]
async fn test_published_year_before_1900_rejected() {
    let app = test_app().await;

    let (status, body) = post(&app, "/lms/books", book(1, "History", 1899, true)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Books published before 1900 are not allowed"));
}

#[tokio::test]
async fn test_enum_values_enforced() {
    let app = test_app().await;

    let (status, body) = post(&app, "/lms/books", book(1, "Poetry", 2000, true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = post(&app, "/lms/members", member(1, "x@lib.org", "staff")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_member_name_too_short_rejected() {
    let app = test_app().await;

    let (status, _) = post(
        &app,
        "/lms/members",
        json!({ "memberID": 1, "name": "Bo", "email": "bo@lib.org", "role": "student" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicates_rejected() {
    let app = test_app().await;

    let (status, _) = post(&app, "/lms/books", book(1, "Fiction", 2000, true)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = post(&app, "/lms/books", book(1, "Science", 2005, true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("duplicate key"));

    let (status, _) = post(&app, "/lms/members", member(1, "a@lib.org", "student")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = post(&app, "/lms/members", member(1, "b@lib.org", "student")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(&app, "/lms/members", member(2, "a@lib.org", "student")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/lms/members").await;
    assert_eq!(member_ids(&body["members"]), vec![1]);
}

#[tokio::test]
async fn test_batch_with_invalid_record_persists_nothing() {
    let app = test_app().await;

    let (status, body) = post(
        &app,
        "/lms/books",
        json!([book(1, "Fiction", 2001, true), book(2, "Fiction", 1850, true)]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("record 1:"));

    let (_, body) = get(&app, "/lms/books").await;
    assert!(body["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_with_duplicate_email_keeps_earlier_members() {
    let app = test_app().await;

    let (status, _) = post(&app, "/lms/members", member(1, "first@lib.org", "student")).await;
    assert_eq!(status, StatusCode::CREATED);

    // Inserts are ordered: the store keeps what it wrote before the collision
    let (status, _) = post(
        &app,
        "/lms/members",
        json!([member(2, "second@lib.org", "student"), member(3, "first@lib.org", "faculty")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/lms/members").await;
    assert_eq!(member_ids(&body["members"]), vec![1, 2]);
}

#[tokio::test]
async fn test_available_books() {
    let app = test_app().await;

    let (status, _) = post(
        &app,
        "/lms/books",
        json!([
            book(1, "Science", 2022, true),
            book(2, "Science", 2021, true),
            book(3, "History", 2022, true),
            book(4, "Science", 2022, false),
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get(&app, "/lms/books/available").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book_ids(&body), vec![1, 2, 3]);

    let (_, body) = get(&app, "/lms/books/available?genre=Science&publishedYear=2022").await;
    assert_eq!(book_ids(&body), vec![1]);

    let (_, body) = get(&app, "/lms/books/available?genre=Science").await;
    assert_eq!(book_ids(&body), vec![1, 2]);

    let (_, body) = get(&app, "/lms/books/available?publishedYear=2022").await;
    assert_eq!(book_ids(&body), vec![1, 3]);

    let (_, body) = get(&app, "/lms/books/available?genre=&publishedYear=").await;
    assert_eq!(book_ids(&body), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_available_books_year_read_as_number() {
    let app = test_app().await;

    post(
        &app,
        "/lms/books",
        json!([book(1, "Science", 2022, true), book(2, "Science", 2021, true)]),
    )
    .await;

    let (status, body) = get(&app, "/lms/books/available?publishedYear=2022.0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book_ids(&body), vec![1]);

    let (status, body) = get(&app, "/lms/books/available?publishedYear=%202021%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book_ids(&body), vec![2]);

    let (status, body) = get(&app, "/lms/books/available?publishedYear=2022.5").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_available_books_non_numeric_year() {
    let app = test_app().await;

    let (status, body) = get(&app, "/lms/books/available?publishedYear=abc").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("Cast to Number failed"));
    assert!(body.get("success").is_none());
}

#[tokio::test]
async fn test_issued_books() {
    let app = test_app().await;

    post(
        &app,
        "/lms/books",
        json!([book(1, "Fiction", 2000, true), book(2, "Biography", 2015, false)]),
    )
    .await;

    let (status, body) = get(&app, "/lms/books/issued").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book_ids(&body["books"]), vec![2]);
}

#[tokio::test]
async fn test_books_by_genre() {
    let app = test_app().await;

    let (status, body) = get(&app, "/lms/books/genre/Fiction").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "books": [] }));

    post(
        &app,
        "/lms/books",
        json!([book(1, "Fiction", 2000, true), book(2, "Technology", 2019, true), book(3, "Fiction", 2011, false)]),
    )
    .await;

    let (_, body) = get(&app, "/lms/books/genre/Fiction").await;
    assert_eq!(book_ids(&body["books"]), vec![1, 3]);

    let (status, body) = get(&app, "/lms/books/genre/Poetry").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recent_members() {
    let app = test_app().await;
    let now = Utc::now();

    let mut old = member(1, "old@lib.org", "student");
    old["joinedDate"] = json!((now - Duration::days(61)).to_rfc3339());
    let mut edge = member(2, "edge@lib.org", "faculty");
    edge["joinedDate"] = json!((now - Duration::days(59)).to_rfc3339());
    let fresh = member(3, "fresh@lib.org", "student");

    let (status, _) = post(&app, "/lms/members", json!([old, edge, fresh])).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get(&app, "/lms/members/recent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member_ids(&body["members"]), vec![2, 3]);
}

#[tokio::test]
async fn test_members_by_role() {
    let app = test_app().await;

    post(
        &app,
        "/lms/members",
        json!([
            member(1, "s1@lib.org", "student"),
            member(2, "f1@lib.org", "faculty"),
            member(3, "s2@lib.org", "student"),
        ]),
    )
    .await;

    let (status, body) = get(&app, "/lms/members/role/student").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member_ids(&body["members"]), vec![1, 3]);

    let (_, body) = get(&app, "/lms/members/role/faculty").await;
    assert_eq!(member_ids(&body["members"]), vec![2]);

    let (_, body) = get(&app, "/lms/members/role/staff").await;
    assert_eq!(body, json!({ "members": [] }));
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/lms/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"bookID\": 1,"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_store_failures_are_server_errors() {
    let app = app_with(Arc::new(UnreachableStore), Connector::connected()).await;

    for uri in [
        "/lms/books",
        "/lms/books/issued",
        "/lms/books/genre/Fiction",
        "/lms/members",
        "/lms/members/recent",
        "/lms/members/role/student",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body["success"], false, "{}", uri);
        assert_eq!(body["message"], "server selection timeout", "{}", uri);
    }

    let (status, body) = get(&app, "/lms/books/available").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "server selection timeout" }));

    let (status, _) = post(&app, "/lms/books", book(1, "Fiction", 2000, true)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = test_app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let app = app_with(Arc::new(MemoryStore::new()), Connector::new()).await;
    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "connecting");
}
