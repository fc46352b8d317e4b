use chrono::{Datelike, Days, NaiveDate};
use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use std::hint::black_box;
use study_tracker::models::{Study, StudyRecord, TimeSlot};
use study_tracker::services::{summarize_by_day, summarize_by_month};

/// A year of daily logging: three records per day across 20 studies.
fn fixture() -> (Vec<StudyRecord>, HashMap<u64, Study>, HashMap<NaiveDate, String>) {
    let studies: HashMap<u64, Study> = (1..=20)
        .map(|id| {
            let study = Study {
                id,
                category: format!("category-{}", id % 4),
                name: format!("study-{}", id),
                created_at: String::new(),
                updated_at: String::new(),
            };
            (id, study)
        })
        .collect();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut records = Vec::new();
    let mut memos = HashMap::new();
    for day in 0..366u64 {
        let date = start + Days::new(day);
        for n in 0..3u64 {
            let id = day * 3 + n + 1;
            records.push(StudyRecord {
                id,
                study_id: id % 20 + 1,
                date: date.format("%Y-%m-%d").to_string(),
                time_slot: TimeSlot::ALL[(id % 6) as usize],
                duration: (id % 90 + 10) as u32,
                created_at: String::new(),
                updated_at: String::new(),
            });
        }
        if date.day() % 7 == 0 {
            memos.insert(date, format!("week {}", date.iso_week().week()));
        }
    }

    (records, studies, memos)
}

fn benchmark_summaries(c: &mut Criterion) {
    let (records, studies, memos) = fixture();

    let mut group = c.benchmark_group("challenge_summaries");

    group.bench_function("monthly_full_year", |b| {
        b.iter(|| summarize_by_month(black_box(&records), &studies, black_box(2024)))
    });

    group.bench_function("daily_february", |b| {
        b.iter(|| {
            summarize_by_day(
                black_box(&records),
                &studies,
                &memos,
                black_box(2024),
                black_box(2),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_summaries);
criterion_main!(benches);
