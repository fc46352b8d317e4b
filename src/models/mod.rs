// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod memo;
pub mod record;
pub mod study;
pub mod summary;

pub use memo::DailyMemo;
pub use record::{RecordUpdate, StudyRecord, TimeSlot};
pub use study::Study;
pub use summary::{DaySummary, MonthSummary, SlotTotals};
