// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Study store with typed operations.
//!
//! Provides high-level operations for:
//! - Studies (category + name)
//! - Records (minutes per study, date and time slot)
//! - Memos (free text per date)
//!
//! Collections live in `DashMap`s so handlers can read concurrently. When a
//! snapshot file is configured, every mutation is followed by a full rewrite
//! of the snapshot, and a mutation whose rewrite fails is undone in memory.

use crate::db::limits::MAX_LABEL_LEN;
use crate::db::{Snapshot, SnapshotFile};
use crate::error::{AppError, Result};
use crate::models::memo::MAX_MEMO_LEN;
use crate::models::{DailyMemo, RecordUpdate, Study, StudyRecord, TimeSlot};
use crate::time_utils::{format_iso_date, now_rfc3339, parse_iso_date};
use chrono::{Datelike, NaiveDate};
use dashmap::DashMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Which records `list_records` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFilter {
    All,
    /// Exactly one date
    Date(NaiveDate),
    /// Inclusive date range
    Range { start: NaiveDate, end: NaiveDate },
    Year(i32),
    /// `month` is 1-12
    Month { year: i32, month: u32 },
}

impl RecordFilter {
    /// Whether a stored date string passes the filter. Unparseable dates
    /// only pass `All`.
    fn matches(&self, raw_date: &str) -> bool {
        if let RecordFilter::All = self {
            return true;
        }
        let Some(date) = parse_iso_date(raw_date) else {
            return false;
        };
        match *self {
            RecordFilter::All => true,
            RecordFilter::Date(d) => date == d,
            RecordFilter::Range { start, end } => start <= date && date <= end,
            RecordFilter::Year(year) => date.year() == year,
            RecordFilter::Month { year, month } => date.year() == year && date.month() == month,
        }
    }
}

struct Inner {
    studies: DashMap<u64, Study>,
    records: DashMap<u64, StudyRecord>,
    /// Keyed by ISO date
    memos: DashMap<String, DailyMemo>,
    next_id: AtomicU64,
    snapshot: Option<SnapshotFile>,
    /// Serializes snapshot writes
    write_lock: tokio::sync::Mutex<()>,
}

/// Study store handle. Cheap to clone; clones share the same data.
#[derive(Clone)]
pub struct StudyDb {
    inner: Arc<Inner>,
}

impl StudyDb {
    /// Create an empty store that is never persisted.
    pub fn in_memory() -> Self {
        Self::from_parts(Snapshot::default(), None)
    }

    /// Open a store backed by a snapshot file, loading it if it exists.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = SnapshotFile::new(path.as_ref());
        let snapshot = file.load().await?.unwrap_or_default();

        tracing::info!(
            path = %file.path().display(),
            studies = snapshot.studies.len(),
            records = snapshot.records.len(),
            memos = snapshot.memos.len(),
            "Loaded study data"
        );

        Ok(Self::from_parts(snapshot, Some(file)))
    }

    fn from_parts(snapshot: Snapshot, file: Option<SnapshotFile>) -> Self {
        // Never hand out an id that is already taken, even if the stored
        // counter is stale.
        let max_id = snapshot
            .studies
            .iter()
            .map(|s| s.id)
            .chain(snapshot.records.iter().map(|r| r.id))
            .max()
            .unwrap_or(0);
        let next_id = snapshot.next_id.max(max_id + 1);

        let inner = Inner {
            studies: snapshot.studies.into_iter().map(|s| (s.id, s)).collect(),
            records: snapshot.records.into_iter().map(|r| (r.id, r)).collect(),
            memos: snapshot
                .memos
                .into_iter()
                .map(|m| (m.date.clone(), m))
                .collect(),
            next_id: AtomicU64::new(next_id),
            snapshot: file,
            write_lock: tokio::sync::Mutex::new(()),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    fn allocate_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Capture the current contents, sorted by id/date.
    pub fn snapshot(&self) -> Snapshot {
        let mut studies: Vec<Study> =
            self.inner.studies.iter().map(|e| e.value().clone()).collect();
        studies.sort_by_key(|s| s.id);

        let mut records: Vec<StudyRecord> =
            self.inner.records.iter().map(|e| e.value().clone()).collect();
        records.sort_by_key(|r| r.id);

        let mut memos: Vec<DailyMemo> =
            self.inner.memos.iter().map(|e| e.value().clone()).collect();
        memos.sort_by(|a, b| a.date.cmp(&b.date));

        Snapshot {
            next_id: self.inner.next_id.load(Ordering::Relaxed),
            studies,
            records,
            memos,
        }
    }

    /// Write the snapshot file, if one is configured.
    async fn persist(&self) -> Result<()> {
        let Some(file) = &self.inner.snapshot else {
            return Ok(());
        };

        let _guard = self.inner.write_lock.lock().await;
        // Taken under the lock so the last writer always writes the latest state
        let snapshot = self.snapshot();
        file.save(&snapshot).await
    }

    // ─── Study Operations ────────────────────────────────────────

    /// All studies, ordered by id.
    pub async fn list_studies(&self) -> Result<Vec<Study>> {
        let mut studies: Vec<Study> =
            self.inner.studies.iter().map(|e| e.value().clone()).collect();
        studies.sort_by_key(|s| s.id);
        Ok(studies)
    }

    /// Get a study by id.
    pub async fn get_study(&self, id: u64) -> Result<Option<Study>> {
        Ok(self.inner.studies.get(&id).map(|e| e.value().clone()))
    }

    /// Study id → study, for resolving names during aggregation.
    pub async fn study_index(&self) -> Result<HashMap<u64, Study>> {
        Ok(self
            .inner
            .studies
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect())
    }

    /// Create a study.
    pub async fn create_study(&self, category: &str, name: &str) -> Result<Study> {
        let category = validate_label("category", category)?;
        let name = validate_label("name", name)?;

        let now = now_rfc3339();
        let study = Study {
            id: self.allocate_id(),
            category,
            name,
            created_at: now.clone(),
            updated_at: now,
        };
        self.inner.studies.insert(study.id, study.clone());
        if let Err(e) = self.persist().await {
            self.inner.studies.remove(&study.id);
            return Err(e);
        }

        tracing::info!(study_id = study.id, name = %study.name, "Study created");
        Ok(study)
    }

    /// Change a study's category and name.
    pub async fn update_study(&self, id: u64, category: &str, name: &str) -> Result<Study> {
        let category = validate_label("category", category)?;
        let name = validate_label("name", name)?;

        let (previous, updated) = {
            let mut entry = self
                .inner
                .studies
                .get_mut(&id)
                .ok_or_else(|| study_not_found(id))?;
            let previous = entry.value().clone();
            entry.category = category;
            entry.name = name;
            entry.updated_at = now_rfc3339();
            (previous, entry.value().clone())
        };
        if let Err(e) = self.persist().await {
            self.inner.studies.insert(id, previous);
            return Err(e);
        }

        tracing::info!(study_id = id, "Study updated");
        Ok(updated)
    }

    /// Delete a study. Its records are kept and will reference a missing study.
    pub async fn delete_study(&self, id: u64) -> Result<()> {
        let (_, removed) = self
            .inner
            .studies
            .remove(&id)
            .ok_or_else(|| study_not_found(id))?;
        if let Err(e) = self.persist().await {
            self.inner.studies.insert(id, removed);
            return Err(e);
        }

        tracing::info!(study_id = id, "Study deleted");
        Ok(())
    }

    // ─── Record Operations ───────────────────────────────────────

    /// Records passing `filter`, ordered by date then id.
    pub async fn list_records(&self, filter: RecordFilter) -> Result<Vec<StudyRecord>> {
        let mut records: Vec<StudyRecord> = self
            .inner
            .records
            .iter()
            .filter(|e| filter.matches(&e.date))
            .map(|e| e.value().clone())
            .collect();
        records.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Get a record by id.
    pub async fn get_record(&self, id: u64) -> Result<Option<StudyRecord>> {
        Ok(self.inner.records.get(&id).map(|e| e.value().clone()))
    }

    /// Log minutes against a study.
    pub async fn create_record(
        &self,
        study_id: u64,
        date: &str,
        time_slot: TimeSlot,
        duration: i64,
    ) -> Result<StudyRecord> {
        let date = validate_date(date)?;
        let duration = validate_duration(duration)?;
        if !self.inner.studies.contains_key(&study_id) {
            return Err(study_not_found(study_id));
        }

        let now = now_rfc3339();
        let record = StudyRecord {
            id: self.allocate_id(),
            study_id,
            date: format_iso_date(date),
            time_slot,
            duration,
            created_at: now.clone(),
            updated_at: now,
        };
        self.inner.records.insert(record.id, record.clone());
        if let Err(e) = self.persist().await {
            self.inner.records.remove(&record.id);
            return Err(e);
        }

        tracing::info!(
            record_id = record.id,
            study_id,
            date = %record.date,
            time_slot = %time_slot,
            duration,
            "Record created"
        );
        Ok(record)
    }

    /// Change only the duration of a record.
    pub async fn update_record_duration(&self, id: u64, duration: i64) -> Result<StudyRecord> {
        self.update_record(
            id,
            RecordUpdate {
                duration: Some(duration),
                ..RecordUpdate::default()
            },
        )
        .await
    }

    /// Apply a partial update. All fields are validated before any is applied.
    pub async fn update_record(&self, id: u64, update: RecordUpdate) -> Result<StudyRecord> {
        let date = update.date.as_deref().map(validate_date).transpose()?;
        let duration = update.duration.map(validate_duration).transpose()?;
        if let Some(study_id) = update.study_id {
            if !self.inner.studies.contains_key(&study_id) {
                return Err(study_not_found(study_id));
            }
        }

        let (previous, updated) = {
            let mut entry = self
                .inner
                .records
                .get_mut(&id)
                .ok_or_else(|| record_not_found(id))?;
            let previous = entry.value().clone();
            if let Some(study_id) = update.study_id {
                entry.study_id = study_id;
            }
            if let Some(date) = date {
                entry.date = format_iso_date(date);
            }
            if let Some(time_slot) = update.time_slot {
                entry.time_slot = time_slot;
            }
            if let Some(duration) = duration {
                entry.duration = duration;
            }
            entry.updated_at = now_rfc3339();
            (previous, entry.value().clone())
        };
        if let Err(e) = self.persist().await {
            self.inner.records.insert(id, previous);
            return Err(e);
        }

        tracing::info!(record_id = id, duration = updated.duration, "Record updated");
        Ok(updated)
    }

    /// Delete a record.
    pub async fn delete_record(&self, id: u64) -> Result<()> {
        let (_, removed) = self
            .inner
            .records
            .remove(&id)
            .ok_or_else(|| record_not_found(id))?;
        if let Err(e) = self.persist().await {
            self.inner.records.insert(id, removed);
            return Err(e);
        }

        tracing::info!(record_id = id, "Record deleted");
        Ok(())
    }

    // ─── Memo Operations ─────────────────────────────────────────

    /// Get the memo for a date.
    pub async fn get_memo(&self, date: &str) -> Result<Option<DailyMemo>> {
        let key = format_iso_date(validate_date(date)?);
        Ok(self.inner.memos.get(&key).map(|e| e.value().clone()))
    }

    /// Create or replace the memo for a date.
    pub async fn set_memo(&self, date: &str, memo: &str) -> Result<DailyMemo> {
        let key = format_iso_date(validate_date(date)?);
        if memo.chars().count() > MAX_MEMO_LEN {
            return Err(AppError::Validation(format!(
                "memo must be at most {} characters",
                MAX_MEMO_LEN
            )));
        }

        let saved = DailyMemo {
            date: key.clone(),
            memo: memo.to_string(),
            updated_at: now_rfc3339(),
        };
        let previous = self.inner.memos.insert(key.clone(), saved.clone());
        if let Err(e) = self.persist().await {
            match previous {
                Some(memo) => self.inner.memos.insert(key, memo),
                None => self.inner.memos.remove(&key).map(|(_, memo)| memo),
            };
            return Err(e);
        }

        tracing::debug!(date = %saved.date, "Memo saved");
        Ok(saved)
    }

    /// Non-empty memos for dates in `start..=end`.
    pub async fn memos_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<NaiveDate, String>> {
        Ok(self
            .inner
            .memos
            .iter()
            .filter(|e| !e.memo.trim().is_empty())
            .filter_map(|e| {
                let date = parse_iso_date(&e.date);
                if date.is_none() {
                    tracing::warn!(date = %e.date, "Skipping memo with unparseable date");
                }
                date.map(|d| (d, e.memo.clone()))
            })
            .filter(|(d, _)| start <= *d && *d <= end)
            .collect())
    }
}

fn study_not_found(id: u64) -> AppError {
    AppError::NotFound(format!("Study {} not found", id))
}

fn record_not_found(id: u64) -> AppError {
    AppError::NotFound(format!("Record {} not found", id))
}

/// Trim a category/name and check it is non-blank and short enough.
fn validate_label(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > MAX_LABEL_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_LABEL_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_date(raw: &str) -> Result<NaiveDate> {
    parse_iso_date(raw).ok_or_else(|| {
        AppError::Validation(format!("Invalid date {:?}: expected YYYY-MM-DD", raw))
    })
}

fn validate_duration(minutes: i64) -> Result<u32> {
    if minutes <= 0 {
        return Err(AppError::Validation(
            "duration must be a positive number of minutes".to_string(),
        ));
    }
    u32::try_from(minutes)
        .map_err(|_| AppError::Validation(format!("duration {} is too large", minutes)))
}
