//! Benchmarks for Glucolog queries, reports and the record store
//!
//! Run with: cargo bench

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use glucolog::query::{self, Granularity, ReportWindow, DAY_MILLIS};
use glucolog::report::{chart_series, summary_stats, Report};
use glucolog::storage::*;
use tempfile::tempdir;

const NOW: i64 = 1_700_000_000_000;

/// `count` readings spread evenly over the last 30 days, newest first
fn create_test_records(count: usize) -> Vec<GlucoseRecord> {
    let step = 30 * DAY_MILLIS / count as i64;
    (0..count)
        .map(|i| {
            let kind = if i % 2 == 0 {
                MealTiming::BeforeMeal
            } else {
                MealTiming::AfterMeal
            };
            GlucoseRecord::with_timestamp(
                format!("r{}", i),
                3.0 + (i % 90) as f64 / 10.0,
                kind,
                NOW - i as i64 * step,
            )
        })
        .collect()
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    for size in [100, 1000, 10000] {
        let records = create_test_records(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("last_7_days_{}", size), |b| {
            b.iter(|| query::last_n_days(black_box(&records), 7, NOW))
        });

        group.bench_function(format!("today_{}", size), |b| {
            b.iter(|| query::today(black_box(&records), NOW, &Utc))
        });
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");

    for size in [100, 1000, 10000] {
        let records = create_test_records(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("summary_stats_{}", size), |b| {
            b.iter(|| summary_stats(black_box(&records)))
        });

        group.bench_function(format!("chart_series_{}", size), |b| {
            b.iter(|| chart_series(black_box(&records), Granularity::MultiDay, &Utc))
        });

        group.bench_function(format!("generate_30days_{}", size), |b| {
            b.iter(|| Report::generate(black_box(&records), ReportWindow::Last30Days, NOW, &Utc))
        });
    }

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("store");

    group.bench_function("save_memory", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let store = RecordStore::in_memory();

                let start = std::time::Instant::now();

                for i in 0..iters {
                    let record = GlucoseRecord::with_timestamp(
                        format!("r{}", i),
                        5.5,
                        MealTiming::BeforeMeal,
                        i as i64,
                    );
                    store.try_save(record).await.unwrap();
                }

                start.elapsed()
            })
        });
    });

    group.bench_function("save_file_into_1000", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let dir = tempdir().unwrap();

                // Setup: a realistic collection already on disk
                let blob = serde_json::to_string(&create_test_records(1000)).unwrap();
                FileKeyValueStore::open(dir.path())
                    .unwrap()
                    .set(DEFAULT_STORAGE_KEY, blob)
                    .await
                    .unwrap();

                let store = RecordStore::open(&StoreConfig::new(dir.path())).unwrap();

                let start = std::time::Instant::now();

                for i in 0..iters {
                    let record = GlucoseRecord::new(5.0 + (i % 40) as f64 / 10.0, MealTiming::AfterMeal);
                    store.try_save(black_box(record)).await.unwrap();
                }

                start.elapsed()
            })
        });
    });

    group.finish();
}

criterion_group!(benches, bench_query, bench_report, bench_store);
criterion_main!(benches);
