// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-date memo routes.

use crate::error::{AppError, Result};
use crate::models::DailyMemo;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/memos/{date}", get(get_memo).put(save_memo))
}

#[derive(Debug, Deserialize, Validate)]
pub struct MemoRequest {
    /// Empty string clears the memo
    #[serde(default)]
    #[validate(length(max = 500))]
    pub memo: String,
}

async fn get_memo(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<DailyMemo>> {
    let memo = state
        .db
        .get_memo(&date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No memo for {}", date)))?;
    Ok(Json(memo))
}

async fn save_memo(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    Json(payload): Json<MemoRequest>,
) -> Result<Json<DailyMemo>> {
    payload.validate()?;

    let saved = state.db.set_memo(&date, &payload.memo).await?;
    Ok(Json(saved))
}
