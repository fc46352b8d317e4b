// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-date memo model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Maximum memo length, in characters.
pub const MAX_MEMO_LEN: usize = 500;

/// Free text attached to a calendar date, shared by every record on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyMemo {
    /// Calendar date, ISO 8601 (`YYYY-MM-DD`)
    pub date: String,
    pub memo: String,
    #[serde(default)]
    pub updated_at: String,
}
