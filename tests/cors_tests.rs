// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{body::Body, http::Request};
use tower::ServiceExt;

mod common;

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/records")
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "PUT")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_preflight_allows_frontend_without_credentials() {
    let (app, _state) = common::create_test_app();

    let response = app.oneshot(preflight("http://localhost:3000")).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
    assert!(headers.get("access-control-allow-credentials").is_none());

    let methods = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    for method in ["GET", "POST", "PUT", "DELETE"] {
        assert!(methods.contains(method), "missing {} in {}", method, methods);
    }
    assert!(!methods.contains("PATCH"), "unexpected PATCH in {}", methods);
}

#[tokio::test]
async fn test_preflight_rejects_unknown_origin() {
    let (app, _state) = common::create_test_app();

    let response = app.oneshot(preflight("https://evil.example")).await.unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}
