//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use ringcache::cache::MAX_CAPACITY;
use ringcache::{api::create_router, AppState, RingCache};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(capacity: usize) -> Router {
    let cache = RingCache::new(capacity, Duration::ZERO).unwrap();
    let state = AppState::new(cache);
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn put_value(app: &Router, key: &str, value: &str) {
    let body = serde_json::json!({ "value": value }).to_string();
    let (status, _) = send(app, "PUT", &format!("/cache/{key}"), Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
}

fn listed_keys(json: &Value) -> Vec<String> {
    json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key"].as_str().unwrap().to_string())
        .collect()
}

// == PUT / GET ==

#[tokio::test]
async fn test_put_then_get() {
    let app = create_test_app(10);
    put_value(&app, "get_key", "get_value").await;

    let (status, json) = send(&app, "GET", "/cache/get_key", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
}

#[tokio::test]
async fn test_get_not_found_has_error_body() {
    let app = create_test_app(10);

    let (status, json) = send(&app, "GET", "/cache/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_put_overwrites() {
    let app = create_test_app(10);
    put_value(&app, "k", "v1").await;
    put_value(&app, "k", "v2").await;

    let (_, json) = send(&app, "GET", "/cache/k", None).await;
    assert_eq!(json["value"], "v2");

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["population"], 1);
}

#[tokio::test]
async fn test_put_invalid_json() {
    let app = create_test_app(10);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache/k")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_put_key_too_long() {
    let app = create_test_app(10);
    let key = "k".repeat(300);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/cache/{key}"),
        Some(r#"{"value":"v"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());

    for method in ["GET", "DELETE"] {
        let (status, _) = send(&app, method, &format!("/cache/{key}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

// == Eviction And Ordering ==

#[tokio::test]
async fn test_lru_eviction_via_api() {
    let app = create_test_app(3);
    put_value(&app, "a", "1").await;
    put_value(&app, "b", "2").await;
    let (status, _) = send(&app, "GET", "/cache/a", None).await;
    assert_eq!(status, StatusCode::OK);
    put_value(&app, "c", "3").await;
    put_value(&app, "d", "4").await;

    let (status, _) = send(&app, "GET", "/cache/b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, "GET", "/cache", None).await;
    assert_eq!(listed_keys(&json), vec!["d", "c", "a"]);
    assert_eq!(json["count"], 3);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["evictions"], 1);
}

#[tokio::test]
async fn test_exists_does_not_touch_recency() {
    let app = create_test_app(2);
    put_value(&app, "a", "1").await;
    put_value(&app, "b", "2").await;

    let (status, json) = send(&app, "GET", "/cache/a/exists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["exists"], true);

    // "a" is still least recently used and gets evicted
    put_value(&app, "c", "3").await;
    let (_, json) = send(&app, "GET", "/cache/a/exists", None).await;
    assert_eq!(json["exists"], false);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["hits"], 0);
    assert_eq!(stats["misses"], 0);
}

// == DELETE / POP ==

#[tokio::test]
async fn test_delete_endpoint() {
    let app = create_test_app(10);
    put_value(&app, "del_key", "v").await;

    let (status, json) = send(&app, "DELETE", "/cache/del_key", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "v");

    let (status, _) = send(&app, "DELETE", "/cache/del_key", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pop_returns_most_recent() {
    let app = create_test_app(10);
    put_value(&app, "a", "1").await;
    put_value(&app, "b", "2").await;

    let (status, json) = send(&app, "POST", "/pop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "b");
    assert_eq!(json["value"], "2");

    send(&app, "POST", "/pop", None).await;
    let (status, json) = send(&app, "POST", "/pop", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

// == Resize ==

#[tokio::test]
async fn test_resize_shrink_and_grow() {
    let app = create_test_app(4);
    for (key, value) in [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")] {
        put_value(&app, key, value).await;
    }

    let (status, json) = send(&app, "PUT", "/capacity", Some(r#"{"capacity":2}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["capacity"], 2);
    assert_eq!(json["population"], 2);

    let (_, json) = send(&app, "GET", "/cache", None).await;
    assert_eq!(listed_keys(&json), vec!["d", "c"]);

    let (_, json) = send(&app, "PUT", "/capacity", Some(r#"{"capacity":5}"#)).await;
    assert_eq!(json["capacity"], 5);
    assert_eq!(json["population"], 2);
}

#[tokio::test]
async fn test_resize_to_zero_rejected() {
    let app = create_test_app(4);
    put_value(&app, "a", "1").await;

    let (status, json) = send(&app, "PUT", "/capacity", Some(r#"{"capacity":0}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("capacity"));

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["capacity"], 4);
    assert_eq!(stats["population"], 1);
}

#[tokio::test]
async fn test_resize_above_max_rejected() {
    let app = create_test_app(4);
    let body = format!(r#"{{"capacity":{}}}"#, MAX_CAPACITY + 1);

    let (status, json) = send(&app, "PUT", "/capacity", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("maximum"));

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["capacity"], 4);
}

// == Stats / Health ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app(10);
    put_value(&app, "a", "1").await;
    send(&app, "GET", "/cache/a", None).await;
    send(&app, "GET", "/cache/missing", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["capacity"], 10);
    assert_eq!(json["ttl_seconds"], 0);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(1);

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
