// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use study_tracker::config::Config;
use study_tracker::db::StudyDb;
use study_tracker::routes::create_router;
use study_tracker::AppState;
use tower::ServiceExt;

/// Create a test app backed by an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), StudyDb::in_memory()));
    (create_router(state.clone()), state)
}

/// Send a request with an optional JSON body and decode the JSON response.
/// Empty bodies decode to `Value::Null`.
#[allow(dead_code)]
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Create a study through the API and return its id.
#[allow(dead_code)]
pub async fn create_study(app: &Router, category: &str, name: &str) -> u64 {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/studies",
        Some(serde_json::json!({ "category": category, "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create study failed: {}", json);
    json["id"].as_u64().unwrap()
}

/// Log a record through the API and return its id.
#[allow(dead_code)]
pub async fn create_record(app: &Router, study_id: u64, date: &str, slot: &str, duration: i64) -> u64 {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/records",
        Some(serde_json::json!({
            "study_id": study_id,
            "date": date,
            "time_slot": slot,
            "duration": duration,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create record failed: {}", json);
    json["id"].as_u64().unwrap()
}
