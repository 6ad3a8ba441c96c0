/// API tests for user creation, authentication and health

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{assert_error, InMemoryRepository, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_create_user() {
    let app = TestApp::new();

    let (status, body) = app
        .request("POST", "/v1/users", Some(json!({ "name": "alice", "password": "p" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "data": { "user_id": "1" } }));
}

#[tokio::test]
async fn test_create_user_then_task_then_get() {
    let app = TestApp::new();

    let (status, _) = app
        .request("POST", "/v1/users", Some(json!({ "name": "alice", "password": "p" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("POST", "/v1/tasks", Some(json!({ "title": "t", "user_id": "1" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request("GET", "/v1/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "t");
}

#[tokio::test]
async fn test_create_user_missing_fields() {
    let app = TestApp::new();

    let (status, body) = app.request("POST", "/v1/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "field_incorrect");
    assert_eq!(
        body["error"]["description"],
        "Field is required: CreateUserRequest.Name"
    );

    let (_, body) = app
        .request("POST", "/v1/users", Some(json!({ "name": "alice" })))
        .await;
    assert_eq!(
        body["error"]["description"],
        "Field is required: CreateUserRequest.Password"
    );

    assert_eq!(app.repo.calls(), 0);
}

#[tokio::test]
async fn test_create_user_null_fields_are_required() {
    let app = TestApp::new();

    let (status, body) = app
        .request("POST", "/v1/users", Some(json!({ "name": "alice", "password": null })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "field_incorrect");
    assert_eq!(
        body["error"]["description"],
        "Field is required: CreateUserRequest.Password"
    );

    assert_eq!(app.repo.calls(), 0);
}

#[tokio::test]
async fn test_duplicate_user_is_internal_error() {
    let app = TestApp::new();
    app.create_user("alice").await;

    let (status, body) = app
        .request("POST", "/v1/users", Some(json!({ "name": "alice", "password": "q" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["description"], "Internal server error");
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/tasks/all")
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, "unauthorized");
    assert_eq!(app.repo.calls(), 0);
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let app = TestApp::new();

    for header in ["Bearer wrong", "Basic dGVzdA==", "test-token"] {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/users")
            .header("authorization", header)
            .header("content-type", "application/json")
            .body(Body::from(json!({ "name": "alice", "password": "p" }).to_string()))
            .unwrap();

        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", header);
        assert_error(&body, "unauthorized");
    }

    assert_eq!(app.repo.calls(), 0);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_storage_failure() {
    let app = TestApp::with_repo(InMemoryRepository::failing());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}
