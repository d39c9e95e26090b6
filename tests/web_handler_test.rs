#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Index page is served
//! - /data returns the indexed decision series for the configured code
//! - ?code= override and its validation
//! - Error responses carry the mapped status and a JSON body

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use fuzzysignal::adapters::web::{build_router, AppState};
use fuzzysignal::domain::system::TradingSystem;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use common::*;

fn create_test_app(port: MockDataPort) -> Router {
    let state = AppState {
        data_port: Arc::new(port),
        system: Arc::new(TradingSystem::standard().unwrap()),
        settings: settings("SWING", 14),
    };
    build_router(state)
}

fn default_app() -> Router {
    create_test_app(
        MockDataPort::new()
            .with_bars("SWING", generate_swinging_bars("2024-01-01", 40))
            .with_bars("UP", generate_bars("2024-01-01", 20, 100.0))
            .with_error("BROKEN", "disk read failed"),
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn index_serves_html() {
    let response = default_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("/data"));
}

#[tokio::test]
async fn data_returns_configured_code() {
    let (status, body) = get(default_app(), "/data").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 26);
    assert_eq!(json["0"].as_array().unwrap().len(), 9);
    assert_eq!(json["0"][7], "2024-1-15");
}

#[tokio::test]
async fn data_code_override() {
    let (status, body) = get(default_app(), "/data?code=UP").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 6);
    assert!(object.values().all(|row| row[8] == "Sell"));
}

#[tokio::test]
async fn data_rejects_path_like_code() {
    let (status, body) = get(default_app(), "/data?code=..%2Fsecret").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("invalid symbol code"));
}

#[tokio::test]
async fn unknown_code_is_unprocessable() {
    let (status, body) = get(default_app(), "/data?code=NOPE").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], 422);
    assert!(json["error"].as_str().unwrap().contains("NOPE"));
}

#[tokio::test]
async fn data_port_failure_is_internal_error() {
    let (status, body) = get(default_app(), "/data?code=BROKEN").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("disk read failed"));
}

#[tokio::test]
async fn symbols_lists_available_codes() {
    let (status, body) = get(default_app(), "/symbols").await;
    assert_eq!(status, StatusCode::OK);
    let symbols: Vec<String> = serde_json::from_str(&body).unwrap();
    assert_eq!(symbols, vec!["SWING".to_string(), "UP".into()]);
}

#[tokio::test]
async fn symbols_listing_failure_is_internal_error() {
    let port = MockDataPort::new().with_listing_error("directory unreadable");
    let (status, body) = get(create_test_app(port), "/symbols").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("directory unreadable"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = get(default_app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
}
