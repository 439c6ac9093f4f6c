//! Chart series derivation
//!
//! Turns a record set into ordered (label, value) pairs for a trend line.
//! Records are ordered oldest first, labelled by clock time or date, and
//! collapsed so each label appears once with the value of its earliest record.

use crate::query::Granularity;
use crate::storage::GlucoseRecord;
use chrono::{Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Parallel label and value sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Number of points
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate (label, value) pairs
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Chart payload: either a series or the no-data sentinel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartData {
    NoData,
    Series(ChartSeries),
}

impl ChartData {
    /// The series, if any
    pub fn series(&self) -> Option<&ChartSeries> {
        match self {
            ChartData::NoData => None,
            ChartData::Series(series) => Some(series),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartData::NoData)
    }
}

/// Label for a timestamp: `H:MM` for single-day charts, `M/D` otherwise
pub fn chart_label<Tz: TimeZone>(timestamp: i64, granularity: Granularity, tz: &Tz) -> String {
    let dt = match tz.timestamp_millis_opt(timestamp).single() {
        Some(dt) => dt,
        None => return timestamp.to_string(),
    };

    match granularity {
        Granularity::SingleDay => format!("{}:{:02}", dt.hour(), dt.minute()),
        Granularity::MultiDay => format!("{}/{}", dt.month(), dt.day()),
    }
}

/// Derive a deduplicated, oldest-first chart series
pub fn chart_series<Tz: TimeZone>(
    records: &[GlucoseRecord],
    granularity: Granularity,
    tz: &Tz,
) -> ChartData {
    if records.is_empty() {
        return ChartData::NoData;
    }

    let mut sorted: Vec<&GlucoseRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.timestamp);

    let mut seen = HashSet::new();
    let mut series = ChartSeries::default();

    for record in sorted {
        let label = chart_label(record.timestamp, granularity, tz);
        if seen.insert(label.clone()) {
            series.labels.push(label);
            series.values.push(record.value);
        }
    }

    ChartData::Series(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MealTiming;
    use chrono::Utc;

    fn at(id: &str, value: f64, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> GlucoseRecord {
        let ts = Utc
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .timestamp_millis();
        GlucoseRecord::with_timestamp(id, value, MealTiming::BeforeMeal, ts)
    }

    #[test]
    fn test_empty_is_no_data() {
        let chart = chart_series(&[], Granularity::MultiDay, &Utc);
        assert_eq!(chart, ChartData::NoData);
        assert!(chart.is_no_data());
        assert!(chart.series().is_none());
    }

    #[test]
    fn test_single_day_labels() {
        let records = vec![
            at("b", 7.2, 2024, 3, 10, 13, 5),
            at("a", 5.1, 2024, 3, 10, 8, 30),
        ];

        let chart = chart_series(&records, Granularity::SingleDay, &Utc);
        let series = chart.series().unwrap();

        assert_eq!(series.labels, vec!["8:30", "13:05"]);
        assert_eq!(series.values, vec![5.1, 7.2]);
    }

    #[test]
    fn test_multi_day_labels_dedup_keeps_first() {
        // Input newest first, as the store returns it
        let records = vec![
            at("d", 9.0, 2024, 3, 11, 20, 0),
            at("c", 8.0, 2024, 3, 11, 7, 0),
            at("b", 6.5, 2024, 3, 9, 19, 0),
            at("a", 5.5, 2024, 3, 9, 7, 0),
        ];

        let chart = chart_series(&records, Granularity::MultiDay, &Utc);
        let series = chart.series().unwrap();

        assert_eq!(series.labels, vec!["3/9", "3/11"]);
        assert_eq!(series.values, vec![5.5, 8.0]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_same_minute_dedup() {
        let records = vec![
            at("a", 5.0, 2024, 1, 2, 9, 0),
            at("b", 6.0, 2024, 1, 2, 9, 0),
        ];

        let chart = chart_series(&records, Granularity::SingleDay, &Utc);
        let points: Vec<(&str, f64)> = chart.series().unwrap().points().collect();
        assert_eq!(points, vec![("9:00", 5.0)]);
    }

    #[test]
    fn test_chart_serialization() {
        let json = serde_json::to_value(ChartData::NoData).unwrap();
        assert_eq!(json["status"], "no_data");

        let chart = ChartData::Series(ChartSeries {
            labels: vec!["1/1".to_string()],
            values: vec![5.0],
        });
        let json = serde_json::to_value(chart).unwrap();
        assert_eq!(json["status"], "series");
        assert_eq!(json["labels"][0], "1/1");
    }
}
