//! Time-Range Filters
//!
//! Pure views over a record slice. The clock is always an explicit argument;
//! nothing here reads the current time.
//!
//! All filters preserve the relative order of their input, so the store's
//! newest-first output stays newest-first.

use crate::query::error::{QueryError, QueryResult};
use crate::storage::{GlucoseRecord, TimeRange};
use chrono::{LocalResult, NaiveDate, TimeZone};

/// Milliseconds in a day
pub const DAY_MILLIS: i64 = 86_400_000;

/// Records with `start_ms <= timestamp <= end_ms`
///
/// An inverted range selects nothing.
pub fn by_range(records: &[GlucoseRecord], start_ms: i64, end_ms: i64) -> Vec<GlucoseRecord> {
    match TimeRange::try_new(start_ms, end_ms) {
        Some(range) => in_range(records, range),
        None => Vec::new(),
    }
}

/// Records inside `range`
pub fn in_range(records: &[GlucoseRecord], range: TimeRange) -> Vec<GlucoseRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.timestamp))
        .cloned()
        .collect()
}

/// Records on the local calendar day (in `tz`) containing `now_ms`
pub fn today<Tz: TimeZone>(records: &[GlucoseRecord], now_ms: i64, tz: &Tz) -> Vec<GlucoseRecord> {
    match day_bounds(now_ms, tz) {
        Ok(range) => in_range(records, range),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot compute day bounds");
            Vec::new()
        }
    }
}

/// Records from `n` days before `now_ms` up to `now_ms`
pub fn last_n_days(records: &[GlucoseRecord], n: i64, now_ms: i64) -> Vec<GlucoseRecord> {
    let start = now_ms.saturating_sub(n.saturating_mul(DAY_MILLIS));
    by_range(records, start, now_ms)
}

/// Local midnight of `now_ms`'s date through one millisecond before the next local midnight
pub fn day_bounds<Tz: TimeZone>(now_ms: i64, tz: &Tz) -> QueryResult<TimeRange> {
    let out_of_range = || QueryError::TimestampOutOfRange(now_ms);

    let now = tz.timestamp_millis_opt(now_ms).single().ok_or_else(out_of_range)?;
    let date = now.date_naive();

    let start = local_midnight(date, tz).ok_or_else(out_of_range)?;
    let next = date
        .succ_opt()
        .and_then(|d| local_midnight(d, tz))
        .ok_or_else(out_of_range)?;

    TimeRange::try_new(start, next - 1).ok_or(QueryError::InvalidTimeRange {
        start,
        end: next - 1,
    })
}

/// First instant of `date` in `tz`, in milliseconds
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;

    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Some(dt.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp_millis()),
        // Midnight skipped by a DST jump; the day starts after the gap
        LocalResult::None => {
            let later = midnight + chrono::Duration::hours(1);
            tz.from_local_datetime(&later)
                .earliest()
                .map(|dt| dt.timestamp_millis())
        }
    }
}
