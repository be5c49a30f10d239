mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::{setup_router, TEST_PASSWORD};

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn gold() -> Value {
    json!({
        "instrument": "Gold",
        "analysisPoints": [{"headline": "Breakout", "description": "trend"}],
        "followUpDate": "2026-03-01",
        "followUpTime": "14:00",
        "image": null
    })
}

async fn create_gold(app: &Router) -> Value {
    let (status, body) = send(app, Method::POST, "/api/investments", Some(gold())).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_router().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Server is running");
}

/// New ideas land in followUp with server-assigned fields
#[tokio::test]
async fn test_create_item() {
    let app = setup_router().await;

    let body = create_gold(&app).await;

    assert_eq!(body["status"], "followUp");
    assert_eq!(body["instrument"], "Gold");
    assert_eq!(body["analysisPoints"].as_array().unwrap().len(), 1);
    assert!(body["id"].as_str().is_some());
    assert!(body["creationDate"].as_str().is_some());
    assert!(body.get("executedDate").is_none());
}

#[tokio::test]
async fn test_create_ignores_client_status_and_id() {
    let app = setup_router().await;

    let mut payload = gold();
    payload["status"] = json!("closed");
    payload["id"] = json!("client-chosen");
    payload["creationDate"] = json!("1999-01-01T00:00:00.000Z");

    let (status, body) = send(&app, Method::POST, "/api/investments", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "followUp");
    assert_ne!(body["id"], "client-chosen");
    assert_ne!(body["creationDate"], "1999-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = setup_router().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/investments",
        Some(json!({"instrument": "", "analysisPoints": [{"headline": "h", "description": ""}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("instrument is required"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/investments",
        Some(json!({"instrument": "Gold", "analysisPoints": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("analysis point"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup_router().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/investments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_all_groups_by_status() {
    let app = setup_router().await;

    let first = create_gold(&app).await;
    let second = create_gold(&app).await;
    let id = second["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/investments/{}/status", id),
        Some(json!({"status": "archive"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/investments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["followUp"].as_array().unwrap().len(), 1);
    assert_eq!(body["followUp"][0]["id"], first["id"]);
    assert_eq!(body["executed"], json!([]));
    assert_eq!(body["closed"], json!([]));
    assert_eq!(body["archive"][0]["id"], second["id"]);
}

#[tokio::test]
async fn test_get_item_by_id() {
    let app = setup_router().await;
    let created = create_gold(&app).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/investments/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, body) = send(&app, Method::GET, "/api/investments/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");
}

#[tokio::test]
async fn test_put_merges_execution_fields() {
    let app = setup_router().await;
    let created = create_gold(&app).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/investments/{}", id),
        Some(json!({
            "status": "executed",
            "executedDate": "2026-03-02",
            "openPrice": "2010",
            "openReason": "Retest",
            "executedAnalysis": [
                {"headline": "", "description": ""},
                {"headline": "Entry", "description": "support"}
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "executed");
    assert_eq!(body["openPrice"], "2010");
    assert_eq!(body["analysisPoints"], created["analysisPoints"]);
    assert_eq!(body["creationDate"], created["creationDate"]);
    assert_eq!(body["executedAnalysis"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_put_errors() {
    let app = setup_router().await;
    let created = create_gold(&app).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/investments/missing",
        Some(json!({"instrument": "Oil"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/investments/{}", id),
        Some(json!({"analysisPoints": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/investments/{}", id),
        Some(json!({"status": "pending"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_status_errors() {
    let app = setup_router().await;
    let created = create_gold(&app).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/investments/{}/status", id),
        Some(json!({"status": "done"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid status"));

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/investments/missing/status",
        Some(json!({"status": "archive"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// A second delete of the same id is a 404
#[tokio::test]
async fn test_delete_twice() {
    let app = setup_router().await;
    let created = create_gold(&app).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/investments/{}", id);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item deleted successfully");
    assert_eq!(body["id"], id);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Only the shared password is accepted
#[tokio::test]
async fn test_login() {
    let app = setup_router().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"password": TEST_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_login_with_unreadable_body() {
    let app = setup_router().await;

    for body in [None, Some(json!({"password": 123})), Some(json!({}))] {
        let (status, body) = send(&app, Method::POST, "/api/auth/login", body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid password");
    }
}

#[tokio::test]
async fn test_body_limit() {
    let app = setup_router().await;

    let mut payload = gold();
    payload["image"] = json!("A".repeat(2 * 1024 * 1024));

    let (status, _) = send(&app, Method::POST, "/api/investments", Some(payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
