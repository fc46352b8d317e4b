// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge views: monthly and daily study-time summaries.

use crate::error::Result;
use crate::models::{DaySummary, MonthSummary};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/challenge/monthly/{year}", get(get_monthly_summary))
        .route("/api/challenge/daily/{year}/{month}", get(get_daily_summary))
}

/// Twelve month summaries for a year, January first.
async fn get_monthly_summary(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<MonthSummary>>> {
    tracing::debug!(year, "Fetching monthly summary");
    Ok(Json(state.summary_service.monthly(year).await?))
}

/// One summary per calendar day of a month (1-12).
async fn get_daily_summary(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Vec<DaySummary>>> {
    tracing::debug!(year, month, "Fetching daily summary");
    Ok(Json(state.summary_service.daily(year, month).await?))
}
