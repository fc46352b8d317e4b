// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Study record routes.

use crate::db::RecordFilter;
use crate::error::{AppError, Result};
use crate::models::{RecordUpdate, Study, StudyRecord, TimeSlot};
use crate::time_utils::parse_iso_date;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/records", get(list_records).post(create_record))
        .route(
            "/api/records/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
}

// ─── Responses ───────────────────────────────────────────────

/// A record with its study resolved for display.
#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub study_id: u64,
    /// `None` when the study has been deleted
    pub study_name: Option<String>,
    pub study_category: Option<String>,
    pub date: String,
    pub time_slot: TimeSlot,
    pub duration: u32,
}

impl RecordResponse {
    fn new(record: StudyRecord, study: Option<&Study>) -> Self {
        Self {
            id: record.id,
            study_id: record.study_id,
            study_name: study.map(|s| s.name.clone()),
            study_category: study.map(|s| s.category.clone()),
            date: record.date,
            time_slot: record.time_slot,
            duration: record.duration,
        }
    }
}

async fn to_response(state: &AppState, record: StudyRecord) -> Result<RecordResponse> {
    let study = state.db.get_study(record.study_id).await?;
    Ok(RecordResponse::new(record, study.as_ref()))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RecordsQuery {
    /// Exact date (ISO 8601)
    date: Option<String>,
    /// Inclusive range start, requires `end_date`
    start_date: Option<String>,
    /// Inclusive range end, requires `start_date`
    end_date: Option<String>,
    year: Option<i32>,
    /// 1-12, requires `year`
    month: Option<u32>,
}

fn parse_query_date(name: &str, raw: &str) -> Result<chrono::NaiveDate> {
    parse_iso_date(raw).ok_or_else(|| {
        AppError::Validation(format!("Invalid '{}' parameter: must be YYYY-MM-DD", name))
    })
}

/// Pick the filter for a query. Precedence: `date`, then the range, then
/// `year`/`month`; no parameters lists everything.
fn parse_filter(query: &RecordsQuery) -> Result<RecordFilter> {
    if let Some(date) = &query.date {
        return Ok(RecordFilter::Date(parse_query_date("date", date)?));
    }

    match (&query.start_date, &query.end_date) {
        (Some(start), Some(end)) => {
            let start = parse_query_date("start_date", start)?;
            let end = parse_query_date("end_date", end)?;
            if start > end {
                return Err(AppError::Validation(
                    "'start_date' must not be after 'end_date'".to_string(),
                ));
            }
            return Ok(RecordFilter::Range { start, end });
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(AppError::Validation(
                "'start_date' and 'end_date' must be given together".to_string(),
            ));
        }
        (None, None) => {}
    }

    match (query.year, query.month) {
        (Some(year), Some(month)) => {
            if !(1..=12).contains(&month) {
                return Err(AppError::Validation(
                    "'month' must be between 1 and 12".to_string(),
                ));
            }
            Ok(RecordFilter::Month { year, month })
        }
        (Some(year), None) => Ok(RecordFilter::Year(year)),
        (None, Some(_)) => Err(AppError::Validation(
            "'month' requires 'year'".to_string(),
        )),
        (None, None) => Ok(RecordFilter::All),
    }
}

async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<Vec<RecordResponse>>> {
    let filter = parse_filter(&params)?;
    tracing::debug!(?filter, "Listing records");

    let records = state.db.list_records(filter).await?;
    let studies = state.db.study_index().await?;

    let responses: Vec<RecordResponse> = records
        .into_iter()
        .map(|r| {
            let study = studies.get(&r.study_id);
            RecordResponse::new(r, study)
        })
        .collect();

    Ok(Json(responses))
}

async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<RecordResponse>> {
    let record = state
        .db
        .get_record(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?;
    Ok(Json(to_response(&state, record).await?))
}

// ─── Mutations ───────────────────────────────────────────────

/// Body for logging time. `time_slot` is a slot label (`아침`) or alias
/// (`morning`).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecordRequest {
    pub study_id: u64,
    pub date: String,
    pub time_slot: String,
    #[validate(range(min = 1))]
    pub duration: i64,
}

/// Partial update; omitted fields are unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRecordRequest {
    pub study_id: Option<u64>,
    pub date: Option<String>,
    pub time_slot: Option<String>,
    #[validate(range(min = 1))]
    pub duration: Option<i64>,
}

fn parse_time_slot(raw: &str) -> Result<TimeSlot> {
    raw.parse()
        .map_err(|e: crate::models::record::UnknownTimeSlot| AppError::Validation(e.to_string()))
}

async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>)> {
    payload.validate()?;
    let time_slot = parse_time_slot(&payload.time_slot)?;

    let record = state
        .db
        .create_record(payload.study_id, &payload.date, time_slot, payload.duration)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(&state, record).await?)))
}

async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<Json<RecordResponse>> {
    payload.validate()?;
    let update = RecordUpdate {
        study_id: payload.study_id,
        date: payload.date,
        time_slot: payload.time_slot.as_deref().map(parse_time_slot).transpose()?,
        duration: payload.duration,
    };

    let record = state.db.update_record(id, update).await?;
    Ok(Json(to_response(&state, record).await?))
}

async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    state.db.delete_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
