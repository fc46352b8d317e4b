// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod summary;

pub use summary::{summarize_by_day, summarize_by_month, SummaryService};
