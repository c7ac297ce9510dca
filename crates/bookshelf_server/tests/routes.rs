use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use bookshelf_core::{Catalog, MemoryStore};
use bookshelf_server::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(
        Catalog::open_in_memory().unwrap(),
        MemoryStore::seeded(),
    ))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_author(app: &Router, name: &str) -> i64 {
    let (status, body) = send(app, "POST", "/api/authors", Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_book(app: &Router, title: &str, author_id: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/books",
        Some(json!({"title": title, "author_id": author_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn index_and_health_respond() {
    let app = app();

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"], "/api");

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn author_lifecycle() {
    let app = app();
    let id = create_author(&app, "Ursula K. Le Guin").await;

    let (status, body) = send(&app, "GET", &format!("/api/authors/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ursula K. Le Guin");
    assert_eq!(body["bio"], Value::Null);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/authors/{id}"),
        Some(json!({"bio": "Earthsea", "birth_date": "1929-10-21"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "Earthsea");
    assert_eq!(body["birth_date"], "1929-10-21");
    assert_eq!(body["name"], "Ursula K. Le Guin");

    let (status, body) = send(&app, "DELETE", &format!("/api/authors/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains(&id.to_string()));

    let (status, body) = send(&app, "GET", &format!("/api/authors/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_body_is_treated_as_empty_fields() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/authors", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/authors")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_integer_id_and_unknown_route_are_not_found() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/authors/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/api/publishers", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn book_errors_map_to_statuses() {
    let app = app();
    let author_id = create_author(&app, "Author").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"title": "Orphan", "author_id": 9999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let book = json!({"title": "Twin", "isbn": "978-0", "author_id": author_id});
    let (status, _) = send(&app, "POST", "/api/books", Some(book.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/api/books", Some(book)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, by_author) =
        send(&app, "GET", &format!("/api/authors/{author_id}/books"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_author, body);
}

#[tokio::test]
async fn reviews_validate_and_list_per_book() {
    let app = app();
    let author_id = create_author(&app, "Author").await;
    let book_id = create_book(&app, "Reviewed", author_id).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(json!({"rating": 6, "reviewer_name": "A", "book_id": book_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, review) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(json!({"rating": 5, "reviewer_name": "A", "book_id": book_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["book_id"], book_id);

    let (status, body) = send(&app, "GET", &format!("/api/books/{book_id}/reviews"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([review]));

    let (status, _) = send(&app, "GET", "/api/books/9999/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_author_cascades_over_http() {
    let app = app();
    let author_id = create_author(&app, "Gone").await;
    let book_id = create_book(&app, "Gone Book", author_id).await;
    let (_, review) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(json!({"rating": 3, "reviewer_name": "A", "book_id": book_id})),
    )
    .await;
    let review_id = review["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/api/authors/{author_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/books/{book_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &format!("/api/reviews/{review_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn memory_routes() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/memory", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["site_metrics"]["visitors"], 12345);
    assert_eq!(body["popular_books"].as_array().unwrap().len(), 5);

    let (status, _) = send(&app, "POST", "/api/memory/search", Some(json!({"query": "rust"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/api/memory/search", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/memory/recent_searches", None).await;
    assert_eq!(status, StatusCode::OK);
    let searches = body["recent_searches"].as_array().unwrap();
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[0]["query"], "rust");
    assert_eq!(searches[1]["query"], "");

    let (status, body) = send(&app, "PUT", "/api/memory/metrics", Some(json!({"page_views": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"]["page_views"], 1);
    assert_eq!(body["metrics"]["visitors"], 12345);

    let (status, _) = send(&app, "PUT", "/api/memory/metrics", Some(json!({"visitors": "lots"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/memory/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("unknown"));
}

#[tokio::test]
async fn get_on_write_only_memory_paths_is_key_not_found() {
    let app = app();
    for key in ["search", "metrics"] {
        let (status, body) = send(&app, "GET", &format!("/api/memory/{key}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains(key));
    }
}
