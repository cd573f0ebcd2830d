//! HTTP round-trips against the router, driven in-process with
//! `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use docstore::server::router;
use docstore::{DocumentService, FileStore};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app() -> (TempDir, Router) {
    let tmp = TempDir::new().unwrap();
    let store = FileStore::open(tmp.path()).unwrap();
    let app = router(DocumentService::new(Arc::new(store)));
    (tmp, app)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (_tmp, app) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_create_get_list() {
    let (_tmp, app) = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/documents",
        Some(json!({ "title": "T1", "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("document_"));
    assert_eq!(created["created_at"], created["updated_at"]);

    let (status, fetched) = send(&app, Method::GET, &format!("/documents/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, listed) = send(&app, Method::GET, "/documents", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = listed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());
    assert_eq!(items[0]["title"], "T1");
    assert!(items[0].get("content").is_none());
}

#[tokio::test]
async fn test_patch_updates_fields() {
    let (_tmp, app) = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/documents",
        Some(json!({ "title": "Draft", "content": "v1" })),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/documents/{}", id),
        Some(json!({ "content": "v2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Draft");
    assert_eq!(updated["content"], "v2");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);
}

#[tokio::test]
async fn test_missing_document_is_404() {
    let (_tmp, app) = app();
    let (status, body) = send(&app, Method::GET, "/documents/document_missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/documents/document_missing",
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_overlong_id_is_404() {
    let (_tmp, app) = app();
    let uri = format!("/documents/document_{}", "a".repeat(300));

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_corrupt_index_is_500() {
    let (tmp, app) = app();
    fs::write(tmp.path().join("index.json"), "{ broken").unwrap();

    let (status, body) = send(&app, Method::GET, "/documents", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal");
    assert_eq!(body["error"]["message"], "internal server error");
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let (_tmp, app) = app();
    let (status, body) = send(&app, Method::GET, "/documents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
