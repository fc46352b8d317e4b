// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Study record model and the fixed set of daily time slots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One of the six fixed periods of a day in which study happens.
///
/// Serialized with the Korean labels used by the frontend; the English
/// snake_case names are accepted as aliases on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TimeSlot {
    #[serde(rename = "출근길", alias = "commute_to")]
    CommuteTo,
    #[serde(rename = "아침", alias = "morning")]
    Morning,
    #[serde(rename = "점심", alias = "lunch")]
    Lunch,
    #[serde(rename = "퇴근길", alias = "commute_from")]
    CommuteFrom,
    #[serde(rename = "퇴근후", alias = "after_work")]
    AfterWork,
    #[serde(rename = "기타", alias = "other")]
    Other,
}

impl TimeSlot {
    /// All slots in display order.
    pub const ALL: [TimeSlot; 6] = [
        TimeSlot::CommuteTo,
        TimeSlot::Morning,
        TimeSlot::Lunch,
        TimeSlot::CommuteFrom,
        TimeSlot::AfterWork,
        TimeSlot::Other,
    ];

    /// Korean display label, also the wire name.
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::CommuteTo => "출근길",
            TimeSlot::Morning => "아침",
            TimeSlot::Lunch => "점심",
            TimeSlot::CommuteFrom => "퇴근길",
            TimeSlot::AfterWork => "퇴근후",
            TimeSlot::Other => "기타",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            TimeSlot::CommuteTo => "commute_to",
            TimeSlot::Morning => "morning",
            TimeSlot::Lunch => "lunch",
            TimeSlot::CommuteFrom => "commute_from",
            TimeSlot::AfterWork => "after_work",
            TimeSlot::Other => "other",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names none of the six slots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown time slot: {0:?}")]
pub struct UnknownTimeSlot(pub String);

impl FromStr for TimeSlot {
    type Err = UnknownTimeSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.label() == s || slot.alias() == s)
            .ok_or_else(|| UnknownTimeSlot(s.to_string()))
    }
}

/// A block of minutes spent on one study, in one slot, on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: u64,
    /// Referenced study; may dangle once the study is deleted
    pub study_id: u64,
    /// Calendar date, ISO 8601 (`YYYY-MM-DD`)
    pub date: String,
    pub time_slot: TimeSlot,
    /// Minutes, always positive
    pub duration: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Partial update applied to an existing record. `None` fields are kept.
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    pub study_id: Option<u64>,
    pub date: Option<String>,
    pub time_slot: Option<TimeSlot>,
    pub duration: Option<i64>,
}
