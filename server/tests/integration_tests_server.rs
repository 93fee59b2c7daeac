use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use common::Task;
use http_body_util::BodyExt; // For `collect`
use serde_json::{Value, json};
use server::database::{SqliteStore, create_schema};
use server::routes::create_router;
use server::store::{MemoryStore, TaskStore};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt; // For `oneshot`

/// Helper function to set up a fresh, in-memory database for each test.
async fn setup_test_store() -> SqliteStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory SQLite");

    create_schema(&pool)
        .await
        .expect("Failed to create todos table in test DB");

    SqliteStore::new(pool)
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn list(app: &Router) -> Vec<Task> {
    let response = app.clone().oneshot(empty_request("GET", "/todos")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn create(app: &Router, payload: Value) -> Task {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/todos", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_create_and_list_tasks() {
    let app = create_router(setup_test_store().await);

    // Act: Create a new task via POST request
    let created = create(
        &app,
        json!({ "title": "Write report", "description": "Quarterly numbers" }),
    )
    .await;

    // Assert: Check that the task was created successfully
    assert_eq!(created.title, "Write report");
    assert_eq!(created.description.as_deref(), Some("Quarterly numbers"));
    assert!(!created.id.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    // Act + Assert: the list contains exactly that task
    let tasks = list(&app).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0], created);
}

#[tokio::test]
async fn test_buy_milk_lifecycle() {
    let app = create_router(setup_test_store().await);

    // Create
    let response = app
        .clone()
        .oneshot(json_request("POST", "/todos", &json!({ "title": "Buy milk" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let raw: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(raw["title"], "Buy milk");
    assert!(raw.get("description").is_none());
    assert!(raw.get("alert").is_none());
    assert!(raw.get("createdAt").is_some());
    let id = raw["id"].as_str().unwrap().to_string();

    // List
    let tasks = list(&app).await;
    assert!(tasks.iter().any(|t| t.id == id && t.title == "Buy milk"));

    // Update
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/todos/{id}"),
            &json!({ "title": "Buy oat milk" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Task = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "Buy oat milk");

    // Delete
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/todos/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    // The list no longer includes it
    assert!(list(&app).await.iter().all(|t| t.id != id));
}

#[tokio::test]
async fn test_create_with_partial_alert_is_rejected() {
    let store = setup_test_store().await;
    let app = create_router(store.clone());

    let payload = json!({ "title": "Call dentist", "alert": { "date": "2024-01-01" } });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/todos", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error_response: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error_response["message"], "Alert must have date, time, and phone.");

    // Nothing was persisted
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_wrongly_typed_alert_is_rejected() {
    let store = setup_test_store().await;
    let app = create_router(store.clone());

    let payloads = [
        json!({ "title": "Call dentist", "alert": "tomorrow" }),
        json!({
            "title": "Call dentist",
            "alert": { "date": 20240101, "time": "09:30", "phone": "555-0100" }
        }),
    ];
    for payload in payloads {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/todos", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error_response: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(error_response["message"].as_str().unwrap().contains("alert"));
    }

    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_with_wrongly_typed_alert_is_rejected() {
    let app = create_router(setup_test_store().await);
    let existing = create(&app, json!({ "title": "Existing" })).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/todos/{}", existing.id),
            &json!({ "title": "Changed", "alert": "tomorrow" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error_response: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error_response["message"].is_string());
    assert_eq!(list(&app).await, vec![existing]);
}

#[tokio::test]
async fn test_malformed_json_gets_message_body() {
    let app = create_router(setup_test_store().await);

    let request = Request::builder()
        .method("POST")
        .uri("/todos")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error_response: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error_response["message"].is_string());
}

#[tokio::test]
async fn test_create_with_complete_alert() {
    let app = create_router(setup_test_store().await);

    let created = create(
        &app,
        json!({
            "title": "Call dentist",
            "alert": { "date": "2024-01-01", "time": "09:30", "phone": "555-0100" }
        }),
    )
    .await;

    let alert = created.alert.expect("alert should be stored");
    assert_eq!(alert.date, "2024-01-01");
    assert_eq!(alert.time, "09:30");
    assert_eq!(alert.phone, "555-0100");
    assert_eq!(list(&app).await[0].alert.as_ref(), Some(&alert));
}

#[tokio::test]
async fn test_create_task_empty_title() {
    let app = create_router(setup_test_store().await);

    for payload in [json!({ "title": "   " }), json!({ "description": "no title" })] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/todos", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error_response: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error_response["message"], "Title cannot be empty.");
    }

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_update_unknown_task_leaves_store_unchanged() {
    let app = create_router(setup_test_store().await);
    let existing = create(&app, json!({ "title": "Existing" })).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/todos/does-not-exist",
            &json!({ "title": "Ghost" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error_response: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error_response["message"], "Todo not found");
    assert_eq!(list(&app).await, vec![existing]);
}

#[tokio::test]
async fn test_update_with_partial_alert_is_rejected() {
    let app = create_router(setup_test_store().await);
    let existing = create(&app, json!({ "title": "Existing" })).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/todos/{}", existing.id),
            &json!({ "title": "Changed", "alert": { "time": "10:00" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&app).await, vec![existing]);
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let app = create_router(setup_test_store().await);
    let task = create(&app, json!({ "title": "Draft", "description": "v1" })).await;
    let update = json!({ "title": "Final", "description": "v2" });

    let mut results = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("PUT", &format!("/todos/{}", task.id), &update))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Task = serde_json::from_slice(&body_bytes(response).await).unwrap();
        results.push(updated);
    }

    assert_eq!(results[0].title, results[1].title);
    assert_eq!(results[0].description, results[1].description);
    assert_eq!(results[1].title, "Final");
    assert_eq!(results[1].description.as_deref(), Some("v2"));
    assert_eq!(results[1].created_at, task.created_at);
    assert!(results[1].updated_at >= results[0].updated_at);
}

#[tokio::test]
async fn test_delete_unknown_task_is_no_content() {
    let app = create_router(setup_test_store().await);
    let kept = create(&app, json!({ "title": "Keep" })).await;

    // Deleting an id that does not exist is an idempotent success.
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/todos/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(list(&app).await, vec![kept]);
}

#[tokio::test]
async fn test_list_ignores_cache_buster_and_refresh_route_is_gone() {
    let app = create_router(setup_test_store().await);
    create(&app, json!({ "title": "Only one" })).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/todos?_ts=1700000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tasks: Vec<Task> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(tasks.len(), 1);

    let response = app
        .oneshot(empty_request("GET", "/refresh-todos"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_error_is_internal_server_error() {
    let store = setup_test_store().await;
    // Closing the pool makes every query fail.
    store.pool().close().await;
    let app = create_router(store);

    let response = app.oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error_response: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(
        error_response["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to retrieve todos from DB")
    );
}

#[tokio::test]
async fn test_memory_store_serves_the_same_api() {
    let app = create_router(MemoryStore::new());

    let created = create(&app, json!({ "title": "In memory" })).await;
    assert_eq!(list(&app).await, vec![created.clone()]);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/todos/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(list(&app).await.is_empty());
}
