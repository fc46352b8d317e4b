// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Monthly and daily aggregation of study records.
//!
//! The aggregation functions are pure: they take a snapshot of records, a
//! study index for name lookups and (for days) the memos of the month, and
//! return one summary per bucket. Every bucket of the window is present,
//! empty or not, in calendar order.

use crate::db::{RecordFilter, StudyDb};
use crate::error::{AppError, Result};
use crate::models::{DaySummary, MonthSummary, SlotTotals, Study, StudyRecord};
use crate::time_utils::{days_in_month, format_iso_date, korean_weekday, parse_iso_date};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashMap};

/// Running totals for one month or one day.
#[derive(Default)]
struct Bucket {
    totals: SlotTotals,
    study_names: BTreeSet<String>,
}

impl Bucket {
    fn add(&mut self, record: &StudyRecord, studies: &HashMap<u64, Study>) {
        self.totals.add(record.time_slot, record.duration);
        // Dangling study references still count toward the totals
        if let Some(study) = studies.get(&record.study_id) {
            self.study_names.insert(study.name.clone());
        }
    }

    fn into_month(self, month: u32) -> MonthSummary {
        MonthSummary {
            month,
            total_duration: self.totals.total(),
            time_slot_totals: self.totals,
            study_names: self.study_names.into_iter().collect(),
        }
    }

    fn into_day(self, date: NaiveDate, memo: Option<String>) -> DaySummary {
        DaySummary {
            date: format_iso_date(date),
            day_of_week: korean_weekday(date).to_string(),
            total_duration: self.totals.total(),
            time_slot_totals: self.totals,
            study_names: self.study_names.into_iter().collect(),
            memo,
        }
    }
}

/// Parse a record's date, logging and skipping it when malformed.
fn record_date(record: &StudyRecord) -> Option<NaiveDate> {
    let date = parse_iso_date(&record.date);
    if date.is_none() {
        tracing::warn!(
            record_id = record.id,
            date = %record.date,
            "Skipping record with unparseable date"
        );
    }
    date
}

/// Summarize `records` into the 12 months of `year`, January first.
pub fn summarize_by_month(
    records: &[StudyRecord],
    studies: &HashMap<u64, Study>,
    year: i32,
) -> Vec<MonthSummary> {
    let mut buckets: [Bucket; 12] = Default::default();

    for record in records {
        let Some(date) = record_date(record) else {
            continue;
        };
        if date.year() == year {
            buckets[date.month0() as usize].add(record, studies);
        }
    }

    buckets
        .into_iter()
        .zip(1..)
        .map(|(bucket, month)| bucket.into_month(month))
        .collect()
}

/// Summarize `records` into every day of `month` (1-12) of `year`.
///
/// `memos` maps dates to their memo; dates without one get `None`.
pub fn summarize_by_day(
    records: &[StudyRecord],
    studies: &HashMap<u64, Study>,
    memos: &HashMap<NaiveDate, String>,
    year: i32,
    month: u32,
) -> Result<Vec<DaySummary>> {
    let first = first_of_month(year, month)?;
    let mut buckets: Vec<Bucket> = (0..days_in_month(first))
        .map(|_| Bucket::default())
        .collect();

    for record in records {
        let Some(date) = record_date(record) else {
            continue;
        };
        if date.year() == year && date.month() == month {
            buckets[date.day0() as usize].add(record, studies);
        }
    }

    Ok(first
        .iter_days()
        .zip(buckets)
        .map(|(date, bucket)| {
            let memo = memos.get(&date).cloned();
            bucket.into_day(date, memo)
        })
        .collect())
}

/// First day of a month, rejecting out-of-range windows.
pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid month {}-{}: month must be 1-12",
            year, month
        ))
    })
}

/// Reads a window from the store and runs the aggregation over it.
#[derive(Clone)]
pub struct SummaryService {
    db: StudyDb,
}

impl SummaryService {
    pub fn new(db: StudyDb) -> Self {
        Self { db }
    }

    /// Twelve monthly summaries for `year`.
    pub async fn monthly(&self, year: i32) -> Result<Vec<MonthSummary>> {
        // Checks the year is representable before touching the store
        first_of_month(year, 1)?;

        let records = self.db.list_records(RecordFilter::Year(year)).await?;
        let studies = self.db.study_index().await?;

        let summaries = summarize_by_month(&records, &studies, year);
        tracing::debug!(
            year,
            records = records.len(),
            total = summaries.iter().map(|s| s.total_duration).sum::<u64>(),
            "Computed monthly summary"
        );
        Ok(summaries)
    }

    /// One summary per calendar day of `month` (1-12) in `year`.
    pub async fn daily(&self, year: i32, month: u32) -> Result<Vec<DaySummary>> {
        let first = first_of_month(year, month)?;
        let last = first
            .checked_add_days(chrono::Days::new(u64::from(days_in_month(first)) - 1))
            .unwrap_or(first);

        let records = self
            .db
            .list_records(RecordFilter::Month { year, month })
            .await?;
        let studies = self.db.study_index().await?;
        let memos = self.db.memos_between(first, last).await?;

        let summaries = summarize_by_day(&records, &studies, &memos, year, month)?;
        tracing::debug!(
            year,
            month,
            days = summaries.len(),
            memos = memos.len(),
            "Computed daily summary"
        );
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSlot;

    fn make_study(id: u64, name: &str) -> Study {
        Study {
            id,
            category: "테스트".to_string(),
            name: name.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn make_record(id: u64, study_id: u64, date: &str, slot: TimeSlot, minutes: u32) -> StudyRecord {
        StudyRecord {
            id,
            study_id,
            date: date.to_string(),
            time_slot: slot,
            duration: minutes,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn index(studies: Vec<Study>) -> HashMap<u64, Study> {
        studies.into_iter().map(|s| (s.id, s)).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_year_has_twelve_zero_months() {
        let summaries = summarize_by_month(&[], &HashMap::new(), 2024);

        assert_eq!(summaries.len(), 12);
        for (i, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.month, i as u32 + 1);
            assert_eq!(summary.total_duration, 0);
            assert!(summary.time_slot_totals.iter().all(|(_, m)| m == 0));
            assert!(summary.study_names.is_empty());
        }
    }

    #[test]
    fn test_month_buckets_ignore_input_order_and_other_years() {
        let studies = index(vec![make_study(1, "영어"), make_study(2, "수학")]);
        let records = vec![
            make_record(1, 2, "2024-12-31", TimeSlot::AfterWork, 60),
            make_record(2, 1, "2023-03-10", TimeSlot::Morning, 500),
            make_record(3, 1, "2024-01-02", TimeSlot::Morning, 30),
            make_record(4, 2, "2024-01-05", TimeSlot::CommuteTo, 15),
        ];

        let summaries = summarize_by_month(&records, &studies, 2024);

        let january = &summaries[0];
        assert_eq!(january.month, 1);
        assert_eq!(january.total_duration, 45);
        assert_eq!(january.time_slot_totals.get(TimeSlot::Morning), 30);
        assert_eq!(january.time_slot_totals.get(TimeSlot::CommuteTo), 15);
        assert_eq!(january.study_names, ["수학", "영어"]);

        assert_eq!(summaries[2].total_duration, 0, "2023 record must not leak");
        assert_eq!(summaries[11].total_duration, 60);
        assert_eq!(summaries[11].study_names, ["수학"]);
    }

    #[test]
    fn test_day_count_matches_calendar() {
        let none = HashMap::new();
        let memos = HashMap::new();

        let jan = summarize_by_day(&[], &none, &memos, 2024, 1).unwrap();
        let feb_2023 = summarize_by_day(&[], &none, &memos, 2023, 2).unwrap();
        let feb_2024 = summarize_by_day(&[], &none, &memos, 2024, 2).unwrap();
        let apr = summarize_by_day(&[], &none, &memos, 2024, 4).unwrap();

        assert_eq!(jan.len(), 31);
        assert_eq!(feb_2023.len(), 28);
        assert_eq!(feb_2024.len(), 29);
        assert_eq!(apr.len(), 30);

        assert_eq!(feb_2024[0].date, "2024-02-01");
        assert_eq!(feb_2024[28].date, "2024-02-29");
        assert_eq!(jan[0].day_of_week, "월");
    }

    #[test]
    fn test_day_slot_totals() {
        let studies = index(vec![make_study(1, "영어")]);
        let records = vec![
            make_record(1, 1, "2024-03-05", TimeSlot::Morning, 30),
            make_record(2, 1, "2024-03-05", TimeSlot::Lunch, 20),
        ];

        let days = summarize_by_day(&records, &studies, &HashMap::new(), 2024, 3).unwrap();
        let day = &days[4];

        assert_eq!(day.date, "2024-03-05");
        assert_eq!(day.total_duration, 50);
        for (slot, minutes) in day.time_slot_totals.iter() {
            let expected = match slot {
                TimeSlot::Morning => 30,
                TimeSlot::Lunch => 20,
                _ => 0,
            };
            assert_eq!(minutes, expected, "slot {}", slot);
        }
        assert_eq!(day.study_names, ["영어"]);
        assert!(days
            .iter()
            .filter(|d| d.date != "2024-03-05")
            .all(|d| d.total_duration == 0));
    }

    #[test]
    fn test_missing_study_counts_duration_but_not_name() {
        let studies = index(vec![make_study(1, "영어")]);
        let records = vec![
            make_record(1, 1, "2024-05-01", TimeSlot::Other, 10),
            make_record(2, 99, "2024-05-01", TimeSlot::Other, 25),
        ];

        let months = summarize_by_month(&records, &studies, 2024);
        assert_eq!(months[4].total_duration, 35);
        assert_eq!(months[4].study_names, ["영어"]);

        let days = summarize_by_day(&records, &studies, &HashMap::new(), 2024, 5).unwrap();
        assert_eq!(days[0].total_duration, 35);
        assert_eq!(days[0].study_names, ["영어"]);
    }

    #[test]
    fn test_malformed_dates_are_skipped() {
        let records = vec![
            make_record(1, 1, "not-a-date", TimeSlot::Morning, 100),
            make_record(2, 1, "2024-02-30", TimeSlot::Morning, 100),
            make_record(3, 1, "2024-02-10", TimeSlot::Morning, 10),
        ];

        let months = summarize_by_month(&records, &HashMap::new(), 2024);
        let total: u64 = months.iter().map(|m| m.total_duration).sum();
        assert_eq!(total, 10);

        let days = summarize_by_day(&records, &HashMap::new(), &HashMap::new(), 2024, 2).unwrap();
        assert_eq!(days.iter().map(|d| d.total_duration).sum::<u64>(), 10);
    }

    #[test]
    fn test_slot_sum_equals_total_in_every_bucket() {
        let studies = index(vec![make_study(1, "영어")]);
        let records: Vec<StudyRecord> = (0..60u32)
            .map(|i| {
                let slot = TimeSlot::ALL[i as usize % TimeSlot::ALL.len()];
                let date = format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1);
                make_record(u64::from(i), 1, &date, slot, i * 7 + 1)
            })
            .collect();

        for month in summarize_by_month(&records, &studies, 2024) {
            let slot_sum: u64 = month.time_slot_totals.iter().map(|(_, m)| m).sum();
            assert_eq!(slot_sum, month.total_duration);
        }
        for month in 1..=12 {
            for day in summarize_by_day(&records, &studies, &HashMap::new(), 2024, month).unwrap() {
                let slot_sum: u64 = day.time_slot_totals.iter().map(|(_, m)| m).sum();
                assert_eq!(slot_sum, day.total_duration);
            }
        }
    }

    #[test]
    fn test_memo_attached_to_its_day() {
        let mut memos = HashMap::new();
        memos.insert(ymd(2024, 6, 15), "모의고사".to_string());

        let days = summarize_by_day(&[], &HashMap::new(), &memos, 2024, 6).unwrap();

        assert_eq!(days[14].memo.as_deref(), Some("모의고사"));
        assert_eq!(days.iter().filter(|d| d.memo.is_some()).count(), 1);
    }

    #[test]
    fn test_invalid_month_rejected() {
        let err = summarize_by_day(&[], &HashMap::new(), &HashMap::new(), 2024, 13).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = summarize_by_day(&[], &HashMap::new(), &HashMap::new(), 2024, 0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_service_reflects_deleted_records() {
        let db = StudyDb::in_memory();
        let service = SummaryService::new(db.clone());
        let study = db.create_study("어학", "영어").await.unwrap();
        let keep = db
            .create_record(study.id, "2024-07-01", TimeSlot::Morning, 30)
            .await
            .unwrap();
        let gone = db
            .create_record(study.id, "2024-07-01", TimeSlot::Morning, 40)
            .await
            .unwrap();

        assert_eq!(service.monthly(2024).await.unwrap()[6].total_duration, 70);

        db.delete_record(gone.id).await.unwrap();

        assert_eq!(service.monthly(2024).await.unwrap()[6].total_duration, 30);
        let days = service.daily(2024, 7).await.unwrap();
        assert_eq!(days[0].total_duration, 30);
        assert!(db.get_record(keep.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_service_daily_includes_memos() {
        let db = StudyDb::in_memory();
        let service = SummaryService::new(db.clone());
        db.set_memo("2024-02-29", "윤일").await.unwrap();
        db.set_memo("2024-03-01", "next month").await.unwrap();

        let days = service.daily(2024, 2).await.unwrap();

        assert_eq!(days.len(), 29);
        assert_eq!(days[28].memo.as_deref(), Some("윤일"));
        assert_eq!(days.iter().filter(|d| d.memo.is_some()).count(), 1);
    }
}
