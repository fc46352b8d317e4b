// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Study CRUD routes.

use crate::error::{AppError, Result};
use crate::models::Study;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/studies", get(list_studies).post(create_study))
        .route(
            "/api/studies/{id}",
            get(get_study).put(update_study).delete(delete_study),
        )
}

/// Body for creating or updating a study.
#[derive(Debug, Deserialize, Validate)]
pub struct StudyRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

async fn list_studies(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Study>>> {
    Ok(Json(state.db.list_studies().await?))
}

async fn get_study(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Study>> {
    let study = state
        .db
        .get_study(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Study {} not found", id)))?;
    Ok(Json(study))
}

async fn create_study(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StudyRequest>,
) -> Result<(StatusCode, Json<Study>)> {
    payload.validate()?;

    let study = state
        .db
        .create_study(&payload.category, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(study)))
}

async fn update_study(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(payload): Json<StudyRequest>,
) -> Result<Json<Study>> {
    payload.validate()?;

    let study = state
        .db
        .update_study(id, &payload.category, &payload.name)
        .await?;
    Ok(Json(study))
}

/// Delete a study. Records that reference it are left in place.
async fn delete_study(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    state.db.delete_study(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
