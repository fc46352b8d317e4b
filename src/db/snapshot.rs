// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON snapshot file holding the full contents of the store.
//!
//! The whole dataset is rewritten after every mutation. Writes go to a
//! sibling `.tmp` file first and are renamed into place, so a crash never
//! leaves a half-written snapshot behind.

use crate::error::AppError;
use crate::models::{DailyMemo, Study, StudyRecord};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serialized form of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Next id to hand out
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub studies: Vec<Study>,
    #[serde(default)]
    pub records: Vec<StudyRecord>,
    #[serde(default)]
    pub memos: Vec<DailyMemo>,
}

/// On-disk layout accepted when loading. Records are kept as raw JSON so a
/// single bad entry is dropped instead of failing the whole load.
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    studies: Vec<Study>,
    #[serde(default)]
    records: Vec<serde_json::Value>,
    #[serde(default)]
    memos: Vec<DailyMemo>,
}

/// Location of the snapshot on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing file yields `None`.
    pub async fn load(&self) -> Result<Option<Snapshot>, AppError> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let raw: RawSnapshot = serde_json::from_str(&data).map_err(|e| {
            AppError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        let mut records = Vec::with_capacity(raw.records.len());
        for value in raw.records {
            match serde_json::from_value::<StudyRecord>(value.clone()) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    error = %e,
                    record = %value,
                    "Dropping unreadable record from snapshot"
                ),
            }
        }

        Ok(Some(Snapshot {
            next_id: raw.next_id,
            studies: raw.studies,
            records,
            memos: raw.memos,
        }))
    }

    /// Atomically replace the snapshot file.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        let data = serde_json::to_string_pretty(snapshot)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Snapshot encoding failed: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}
