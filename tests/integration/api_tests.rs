//! API integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use bookshelf_server::{
    api,
    config::DatabaseConfig,
    repository::{self, SqliteBookStore},
    AppState,
};

/// Router over a fresh in-memory database
async fn test_app() -> Router {
    test_app_with_pool().await.0
}

async fn test_app_with_pool() -> (Router, SqlitePool) {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = repository::connect(&config)
        .await
        .expect("Failed to open in-memory database");
    repository::init_schema(&pool)
        .await
        .expect("Failed to create schema");

    let app = api::create_router(AppState::new(Arc::new(SqliteBookStore::new(pool.clone()))));
    (app, pool)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).expect("Failed to build request"))
        .await
        .expect("Failed to send request")
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Failed to parse response")
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_create_book_on_empty_store() {
    let app = test_app().await;

    let response = send(
        &app,
        Method::POST,
        "/books",
        Some(r#"{"title":"Dune","author":"Herbert"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        json_body(response).await,
        json!({"id": 1, "title": "Dune", "author": "Herbert"})
    );
}

#[tokio::test]
async fn test_create_without_content_type() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .body(Body::from(r#"{"title":"Emma","author":"Austen"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_with_empty_title() {
    let app = test_app().await;

    let response = send(&app, Method::POST, "/books", Some(r#"{"title":"","author":"X"}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["message"], "title is required");

    let list = json_body(send(&app, Method::GET, "/books", None).await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_with_malformed_body() {
    let app = test_app().await;

    for body in ["{not json", r#"{"title":"Dune"}"#, "[]"] {
        let response = send(&app, Method::POST, "/books", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json_body(response).await["error"], "MalformedInput");
    }
}

#[tokio::test]
async fn test_list_books_in_insertion_order() {
    let app = test_app().await;

    for (title, author) in [("Dune", "Herbert"), ("Emma", "Austen"), ("Ulysses", "Joyce")] {
        let body = json!({"title": title, "author": author}).to_string();
        let response = send(&app, Method::POST, "/books", Some(&body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&app, Method::GET, "/books", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .expect("Expected an array")
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Dune", "Emma", "Ulysses"]);
}

#[tokio::test]
async fn test_get_missing_book() {
    let app = test_app().await;

    let response = send(&app, Method::GET, "/books/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "NoSuchBook");
}

#[tokio::test]
async fn test_invalid_id() {
    let app = test_app().await;

    for method in [Method::GET, Method::DELETE] {
        let response = send(&app, method, "/books/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    for uri in ["/books/", "/books/1/", "/books/1/x"] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(json_body(response).await["error"], "MalformedInput");
    }

    let response = send(
        &app,
        Method::PUT,
        "/books/abc",
        Some(r#"{"title":"Dune","author":"Herbert"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = test_app().await;

    let created = json_body(
        send(
            &app,
            Method::POST,
            "/books",
            Some(r#"{"title":"Middlemarch","author":"Eliot"}"#),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().expect("No book ID");
    assert!(id > 0);

    let response = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, created);
}

#[tokio::test]
async fn test_update_book() {
    let app = test_app().await;
    send(&app, Method::POST, "/books", Some(r#"{"title":"Dune","author":"Herbert"}"#)).await;

    let response = send(
        &app,
        Method::PUT,
        "/books/1",
        Some(r#"{"id":50,"title":"Dune Messiah","author":"Frank Herbert"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"id": 1, "title": "Dune Messiah", "author": "Frank Herbert"})
    );

    let fetched = json_body(send(&app, Method::GET, "/books/1", None).await).await;
    assert_eq!(fetched["title"], "Dune Messiah");
}

#[tokio::test]
async fn test_update_rejects_bad_input() {
    let app = test_app().await;
    send(&app, Method::POST, "/books", Some(r#"{"title":"Dune","author":"Herbert"}"#)).await;

    let response = send(&app, Method::PUT, "/books/1", Some(r#"{"title":"","author":"X"}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, Method::PUT, "/books/1", Some("nope")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let fetched = json_body(send(&app, Method::GET, "/books/1", None).await).await;
    assert_eq!(fetched["title"], "Dune");
}

#[tokio::test]
async fn test_update_missing_book() {
    let app = test_app().await;

    let response = send(
        &app,
        Method::PUT,
        "/books/42",
        Some(r#"{"title":"Dune","author":"Herbert"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list = json_body(send(&app, Method::GET, "/books", None).await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_delete_then_get() {
    let app = test_app().await;
    send(&app, Method::POST, "/books", Some(r#"{"title":"Dune","author":"Herbert"}"#)).await;

    let response = send(&app, Method::DELETE, "/books/1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());

    let response = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_book() {
    let app = test_app().await;

    let response = send(&app, Method::DELETE, "/books/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_path() {
    let app = test_app().await;

    let response = send(&app, Method::GET, "/authors", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure() {
    let (app, pool) = test_app_with_pool().await;
    pool.close().await;

    let response = send(&app, Method::GET, "/books", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "DbFailure");
    assert_eq!(body["message"], "Database error");
}

#[tokio::test]
async fn test_unsupported_methods() {
    let app = test_app().await;

    let response = send(&app, Method::PATCH, "/books", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = send(&app, Method::DELETE, "/books", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = send(&app, Method::POST, "/books/1", Some("{}")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_served_over_tcp() {
    let app = test_app().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/books", addr))
        .json(&json!({"title": "Dune", "author": "Herbert"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = client
        .get(format!("http://{}/books/1", addr))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["author"], "Herbert");
}
