//! Core data types for the Glucolog record store
//!
//! This module defines the fundamental types used throughout the storage layer:
//! - `GlucoseRecord`: A single blood-glucose reading
//! - `MealTiming`: Whether the reading was taken before or after a meal
//! - `GlucoseStatus`: Classification of a reading into status buckets
//! - `TimeRange`: An inclusive time interval for queries

use crate::storage::error::ValidationError;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of the normal range (mmol/L, inclusive)
pub const NORMAL_LOW: f64 = 3.9;
/// Upper bound of the normal range (mmol/L, inclusive)
pub const NORMAL_HIGH: f64 = 7.8;
/// Upper bound of the high range (mmol/L, inclusive)
pub const HIGH_LIMIT: f64 = 10.0;
/// Largest reading accepted as plausible (mmol/L, inclusive)
pub const MAX_PLAUSIBLE_VALUE: f64 = 200.0;

/// When a reading was taken relative to a meal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealTiming {
    #[default]
    BeforeMeal,
    AfterMeal,
}

impl MealTiming {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MealTiming::BeforeMeal => "Before meal",
            MealTiming::AfterMeal => "After meal",
        }
    }
}

impl std::fmt::Display for MealTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealTiming::BeforeMeal => write!(f, "before_meal"),
            MealTiming::AfterMeal => write!(f, "after_meal"),
        }
    }
}

impl std::str::FromStr for MealTiming {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "before_meal" | "before" => Ok(MealTiming::BeforeMeal),
            "after_meal" | "after" => Ok(MealTiming::AfterMeal),
            other => Err(ValidationError::UnknownMealTiming(other.to_string())),
        }
    }
}

/// Status bucket for a glucose value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseStatus {
    /// Below 3.9 mmol/L
    Low,
    /// 3.9 to 7.8 mmol/L inclusive
    Normal,
    /// Above 7.8, up to 10.0 mmol/L inclusive
    High,
    /// Above 10.0 mmol/L
    VeryHigh,
}

impl GlucoseStatus {
    /// Classify a glucose value
    pub fn classify(value: f64) -> Self {
        if value < NORMAL_LOW {
            GlucoseStatus::Low
        } else if value <= NORMAL_HIGH {
            GlucoseStatus::Normal
        } else if value <= HIGH_LIMIT {
            GlucoseStatus::High
        } else {
            GlucoseStatus::VeryHigh
        }
    }

    /// Collapse into the three buckets used by reports (very-high counts as high)
    pub fn report_bucket(&self) -> Self {
        match self {
            GlucoseStatus::VeryHigh => GlucoseStatus::High,
            other => *other,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            GlucoseStatus::Low => "Low",
            GlucoseStatus::Normal => "Normal",
            GlucoseStatus::High => "High",
            GlucoseStatus::VeryHigh => "Very high",
        }
    }
}

impl std::fmt::Display for GlucoseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlucoseStatus::Low => write!(f, "low"),
            GlucoseStatus::Normal => write!(f, "normal"),
            GlucoseStatus::High => write!(f, "high"),
            GlucoseStatus::VeryHigh => write!(f, "very_high"),
        }
    }
}

/// A single blood-glucose reading
///
/// The serialized shape (`id`, `value`, `type`, `timestamp`, `notes`) is the
/// persisted blob format and must stay stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlucoseRecord {
    /// Opaque unique identifier
    pub id: String,
    /// Glucose measurement in mmol/L
    pub value: f64,
    /// Before or after a meal
    #[serde(rename = "type")]
    pub kind: MealTiming,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Free-text notes
    #[serde(default)]
    pub notes: String,
}

impl GlucoseRecord {
    /// Create a new record with a fresh id and the current timestamp
    pub fn new(value: f64, kind: MealTiming) -> Self {
        Self {
            id: crate::storage::store::generate_id(),
            value,
            kind,
            timestamp: Utc::now().timestamp_millis(),
            notes: String::new(),
        }
    }

    /// Create a record with explicit id and timestamp
    pub fn with_timestamp(
        id: impl Into<String>,
        value: f64,
        kind: MealTiming,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            value,
            kind,
            timestamp,
            notes: String::new(),
        }
    }

    /// Builder method: set notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Check the record invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        validate_value(self.value)
    }

    /// Status bucket of this reading
    pub fn status(&self) -> GlucoseStatus {
        GlucoseStatus::classify(self.value)
    }

    /// Format the timestamp as `YYYY/MM/DD HH:MM` in the given time zone
    pub fn formatted_time<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        tz.timestamp_millis_opt(self.timestamp)
            .single()
            .map(|dt| dt.format("%Y/%m/%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Check that a glucose value is finite, strictly positive and plausible
pub fn validate_value(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite);
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositive(value));
    }
    if value > MAX_PLAUSIBLE_VALUE {
        return Err(ValidationError::Implausible(value));
    }
    Ok(())
}

/// Parse user input into a glucose value
pub fn parse_glucose_value(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    validate_value(value)?;
    Ok(value)
}

/// Time range for queries (closed interval: [start, end])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start timestamp (inclusive), in milliseconds
    pub start: i64,
    /// End timestamp (inclusive), in milliseconds
    pub end: i64,
}

impl TimeRange {
    /// Create a time range, returning None if start > end
    pub fn try_new(start: i64, end: i64) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Check if a timestamp falls within this range
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}
