//! Report windows
//!
//! The fixed periods a report can cover, and the chart granularity each implies.

use crate::query::error::QueryError;
use crate::query::filter::{last_n_days, today};
use crate::storage::GlucoseRecord;
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

/// How chart labels are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Labels are clock times (`H:MM`)
    SingleDay,
    /// Labels are calendar dates (`M/D`)
    MultiDay,
}

/// Period covered by a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportWindow {
    #[serde(rename = "today")]
    Today,
    #[default]
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "30days")]
    Last30Days,
}

impl ReportWindow {
    /// All windows, shortest first
    pub fn all() -> &'static [ReportWindow] {
        &[
            ReportWindow::Today,
            ReportWindow::Last7Days,
            ReportWindow::Last30Days,
        ]
    }

    /// Chart granularity for this window
    pub fn granularity(&self) -> Granularity {
        match self {
            ReportWindow::Today => Granularity::SingleDay,
            ReportWindow::Last7Days | ReportWindow::Last30Days => Granularity::MultiDay,
        }
    }

    /// Select the records inside this window
    pub fn select<Tz: TimeZone>(
        &self,
        records: &[GlucoseRecord],
        now_ms: i64,
        tz: &Tz,
    ) -> Vec<GlucoseRecord> {
        match self {
            ReportWindow::Today => today(records, now_ms, tz),
            ReportWindow::Last7Days => last_n_days(records, 7, now_ms),
            ReportWindow::Last30Days => last_n_days(records, 30, now_ms),
        }
    }
}

impl std::fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportWindow::Today => write!(f, "today"),
            ReportWindow::Last7Days => write!(f, "7days"),
            ReportWindow::Last30Days => write!(f, "30days"),
        }
    }
}

impl std::str::FromStr for ReportWindow {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "1d" => Ok(ReportWindow::Today),
            "7days" | "7d" | "week" => Ok(ReportWindow::Last7Days),
            "30days" | "30d" | "month" => Ok(ReportWindow::Last30Days),
            other => Err(QueryError::InvalidWindow(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filter::DAY_MILLIS;
    use crate::storage::MealTiming;
    use chrono::Utc;

    #[test]
    fn test_parse_window() {
        assert_eq!("today".parse::<ReportWindow>().unwrap(), ReportWindow::Today);
        assert_eq!("7days".parse::<ReportWindow>().unwrap(), ReportWindow::Last7Days);
        assert_eq!("30D".parse::<ReportWindow>().unwrap(), ReportWindow::Last30Days);
        assert!(matches!(
            "fortnight".parse::<ReportWindow>(),
            Err(QueryError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for window in ReportWindow::all() {
            assert_eq!(window.to_string().parse::<ReportWindow>().unwrap(), *window);
        }
    }

    #[test]
    fn test_granularity() {
        assert_eq!(ReportWindow::Today.granularity(), Granularity::SingleDay);
        assert_eq!(ReportWindow::Last7Days.granularity(), Granularity::MultiDay);
        assert_eq!(ReportWindow::Last30Days.granularity(), Granularity::MultiDay);
    }

    #[test]
    fn test_select() {
        let now = 1000 * DAY_MILLIS + 12 * 3_600_000;
        let records: Vec<GlucoseRecord> = [0i64, 2, 10, 40]
            .iter()
            .map(|days| {
                GlucoseRecord::with_timestamp(
                    format!("d{}", days),
                    5.0,
                    MealTiming::BeforeMeal,
                    now - days * DAY_MILLIS,
                )
            })
            .collect();

        assert_eq!(ReportWindow::Today.select(&records, now, &Utc).len(), 1);
        assert_eq!(ReportWindow::Last7Days.select(&records, now, &Utc).len(), 2);
        assert_eq!(ReportWindow::Last30Days.select(&records, now, &Utc).len(), 3);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ReportWindow::Last7Days).unwrap(),
            "\"7days\""
        );
    }
}
