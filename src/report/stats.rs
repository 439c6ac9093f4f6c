//! Summary statistics over a record set

use crate::storage::{GlucoseRecord, GlucoseStatus};
use serde::{Deserialize, Serialize};

/// Mean, extremes and status-bucket counts for a set of readings
///
/// All numeric fields are zero for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Mean value, one decimal place
    pub average: f64,
    /// Maximum value, one decimal place
    pub highest: f64,
    /// Minimum value, one decimal place
    pub lowest: f64,
    /// Readings in 3.9..=7.8
    pub normal_count: usize,
    /// Readings above 7.8 (high and very high)
    pub high_count: usize,
    /// Readings below 3.9
    pub low_count: usize,
}

impl SummaryStats {
    /// Total readings counted
    pub fn total(&self) -> usize {
        self.normal_count + self.high_count + self.low_count
    }

    /// Share of readings in the normal range, 0-100
    pub fn in_range_percent(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => round1(self.normal_count as f64 * 100.0 / n as f64),
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    // Beyond 2^52 every f64 is already whole, and scaling could overflow
    if value.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    (value * 10.0).round() / 10.0
}

/// Reduce a record set to summary statistics
pub fn summary_stats(records: &[GlucoseRecord]) -> SummaryStats {
    if records.is_empty() {
        return SummaryStats::default();
    }

    let mut stats = SummaryStats::default();
    let n = records.len() as f64;
    let mut average = 0.0;
    let mut highest = f64::NEG_INFINITY;
    let mut lowest = f64::INFINITY;

    for record in records {
        average += record.value / n;
        highest = highest.max(record.value);
        lowest = lowest.min(record.value);

        match record.status().report_bucket() {
            GlucoseStatus::Low => stats.low_count += 1,
            GlucoseStatus::Normal => stats.normal_count += 1,
            _ => stats.high_count += 1,
        }
    }

    stats.average = round1(average);
    stats.highest = round1(highest);
    stats.lowest = round1(lowest);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MealTiming;

    fn readings(values: &[f64]) -> Vec<GlucoseRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                GlucoseRecord::with_timestamp(i.to_string(), *v, MealTiming::BeforeMeal, i as i64)
            })
            .collect()
    }

    #[test]
    fn test_empty_is_all_zero() {
        let stats = summary_stats(&[]);
        assert_eq!(stats, SummaryStats::default());
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.in_range_percent(), 0.0);
    }

    #[test]
    fn test_two_reading_scenario() {
        let records = vec![
            GlucoseRecord::with_timestamp("a", 5.0, MealTiming::BeforeMeal, 1000),
            GlucoseRecord::with_timestamp("b", 8.5, MealTiming::AfterMeal, 2000),
        ];

        let stats = summary_stats(&records);
        assert_eq!(
            stats,
            SummaryStats {
                average: 6.8,
                highest: 8.5,
                lowest: 5.0,
                normal_count: 1,
                high_count: 1,
                low_count: 0,
            }
        );
    }

    #[test]
    fn test_huge_values_keep_a_finite_average() {
        // Legacy blobs are not re-validated on load
        let stats = summary_stats(&readings(&[1e308, 1e308]));

        assert!(stats.average.is_finite());
        assert_eq!(stats.average, 1e308);
        assert_eq!(stats.highest, 1e308);

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["average"], 1e308);
    }

    #[test]
    fn test_bucket_boundaries() {
        let stats = summary_stats(&readings(&[3.9, 7.8, 10.0]));
        assert_eq!(stats.low_count, 0);
        assert_eq!(stats.normal_count, 2);
        assert_eq!(stats.high_count, 1);
    }

    #[test]
    fn test_very_high_counts_as_high() {
        let stats = summary_stats(&readings(&[3.2, 12.4, 15.0, 6.0]));
        assert_eq!(stats.low_count, 1);
        assert_eq!(stats.normal_count, 1);
        assert_eq!(stats.high_count, 2);
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.in_range_percent(), 25.0);
    }

    #[test]
    fn test_extremes_rounded() {
        let stats = summary_stats(&readings(&[5.44, 9.96, 6.02]));
        assert_eq!(stats.highest, 10.0);
        assert_eq!(stats.lowest, 5.4);
        assert_eq!(stats.average, 7.1);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(6.75), 6.8);
        assert_eq!(round1(6.74), 6.7);
        assert_eq!(round1(5.0), 5.0);
        assert_eq!(round1(-6.75), -6.8);
        assert_eq!(round1(f64::MAX), f64::MAX);
    }
}
