//! Glucolog Aggregation Engine
//!
//! Reduces a queried record set into the numbers and series a trend report
//! shows:
//!
//! - **stats**: mean, extremes, low/normal/high counts
//! - **chart**: deduplicated oldest-first label/value series
//!
//! Everything is pure and works on literal record slices.
//!
//! # Example
//!
//! ```rust
//! use glucolog::query::ReportWindow;
//! use glucolog::report::Report;
//! use glucolog::storage::{GlucoseRecord, MealTiming};
//! use chrono::Utc;
//!
//! let records = vec![
//!     GlucoseRecord::with_timestamp("b", 8.5, MealTiming::AfterMeal, 2000),
//!     GlucoseRecord::with_timestamp("a", 5.0, MealTiming::BeforeMeal, 1000),
//! ];
//!
//! let report = Report::generate(&records, ReportWindow::Last7Days, 3000, &Utc);
//! assert_eq!(report.stats.average, 6.8);
//! assert_eq!(report.record_count, 2);
//! ```

mod chart;
mod stats;

pub use chart::{chart_label, chart_series, ChartData, ChartSeries};
pub use stats::{round1, summary_stats, SummaryStats};

use crate::query::ReportWindow;
use crate::storage::GlucoseRecord;
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

/// More high readings than this in one window triggers a warning
pub const FREQUENT_HIGH_THRESHOLD: usize = 3;

/// Short guidance attached to a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Several high readings in the window
    FrequentHighs,
    /// Nothing notable
    KeepMonitoring,
}

impl Advisory {
    pub fn from_stats(stats: &SummaryStats) -> Self {
        if stats.high_count > FREQUENT_HIGH_THRESHOLD {
            Advisory::FrequentHighs
        } else {
            Advisory::KeepMonitoring
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Advisory::FrequentHighs => {
                "Several high readings recently. Consider cutting back on carbohydrates and adding exercise."
            }
            Advisory::KeepMonitoring => {
                "Keep up your current diet and exercise habits and keep monitoring regularly."
            }
        }
    }
}

/// Report data for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub window: ReportWindow,
    /// Clock value the window was computed from (ms)
    pub generated_at: i64,
    pub record_count: usize,
    pub stats: SummaryStats,
    pub chart: ChartData,
    pub advisory: Advisory,
}

impl Report {
    /// Select `window` from the full collection and aggregate it
    pub fn generate<Tz: TimeZone>(
        records: &[GlucoseRecord],
        window: ReportWindow,
        now_ms: i64,
        tz: &Tz,
    ) -> Self {
        let selected = window.select(records, now_ms, tz);
        Self::from_selected(&selected, window, now_ms, tz)
    }

    /// Aggregate records already restricted to `window`
    pub fn from_selected<Tz: TimeZone>(
        selected: &[GlucoseRecord],
        window: ReportWindow,
        now_ms: i64,
        tz: &Tz,
    ) -> Self {
        let stats = summary_stats(selected);
        let chart = chart_series(selected, window.granularity(), tz);

        tracing::debug!(
            window = %window,
            records = selected.len(),
            average = stats.average,
            "Report generated"
        );

        Self {
            window,
            generated_at: now_ms,
            record_count: selected.len(),
            stats,
            chart,
            advisory: Advisory::from_stats(&stats),
        }
    }
}
