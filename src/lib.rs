// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Study Tracker: log study time by time slot and review it by month and day.
//!
//! This crate provides the backend API for registering studies, recording
//! time spent on them, attaching per-day memos, and summarizing the records
//! into monthly and daily views.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::StudyDb;
use services::SummaryService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: StudyDb,
    pub summary_service: SummaryService,
}

impl AppState {
    /// Build state around a store, wiring the services that read from it.
    pub fn new(config: Config, db: StudyDb) -> Self {
        let summary_service = SummaryService::new(db.clone());
        Self {
            config,
            db,
            summary_service,
        }
    }
}
