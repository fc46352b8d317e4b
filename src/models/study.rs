// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Study model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A subject the user studies (e.g. category "어학", name "영어 회화").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Study {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Short grouping label
    pub category: String,
    /// Display name
    pub name: String,
    /// When the study was created (RFC3339)
    #[serde(default)]
    pub created_at: String,
    /// Last category/name change (RFC3339)
    #[serde(default)]
    pub updated_at: String,
}
