// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Monthly and daily summaries returned by the challenge views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::TimeSlot;

/// Minutes per time slot. Every slot is always present, empty ones as 0.
///
/// Serializes as a JSON object keyed by slot label in display order,
/// e.g. `{"출근길": 0, "아침": 30, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotTotals(BTreeMap<TimeSlot, u64>);

impl Default for SlotTotals {
    fn default() -> Self {
        Self(TimeSlot::ALL.into_iter().map(|slot| (slot, 0)).collect())
    }
}

impl SlotTotals {
    /// Add minutes to a slot.
    pub fn add(&mut self, slot: TimeSlot, minutes: u32) {
        *self.0.entry(slot).or_insert(0) += u64::from(minutes);
    }

    /// Minutes recorded for a slot.
    pub fn get(&self, slot: TimeSlot) -> u64 {
        self.0.get(&slot).copied().unwrap_or(0)
    }

    /// Sum over all slots.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimeSlot, u64)> + '_ {
        self.0.iter().map(|(slot, minutes)| (*slot, *minutes))
    }
}

/// Aggregates for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthSummary {
    /// Month of year, 1 (January) through 12
    pub month: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub time_slot_totals: SlotTotals,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration: u64,
    /// Distinct names of the studies recorded this month, sorted
    pub study_names: Vec<String>,
}

/// Aggregates for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DaySummary {
    /// ISO 8601 date (`YYYY-MM-DD`)
    pub date: String,
    /// Short Korean weekday name
    pub day_of_week: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub time_slot_totals: SlotTotals,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration: u64,
    pub study_names: Vec<String>,
    pub memo: Option<String>,
}
