//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::nutrition::{Gender, MealAssessment, RecognitionResponse};
use crate::storage::{GlucoseRecord, GlucoseStatus, MealTiming};
use serde::{Deserialize, Serialize};

// ============================================
// RECORD DTOs
// ============================================

/// Create (or overwrite) a record
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    /// Existing id to overwrite; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Glucose value in mmol/L
    pub value: f64,
    /// before_meal or after_meal
    #[serde(rename = "type", default)]
    pub kind: MealTiming,
    /// Optional timestamp (ms since epoch), defaults to now
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Optional notes
    #[serde(default)]
    pub notes: String,
}

/// Partial update of a record; id and timestamp never change
#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(rename = "type", default)]
    pub kind: Option<MealTiming>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A record with its status bucket
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordDto {
    #[serde(flatten)]
    pub record: GlucoseRecord,
    pub status: GlucoseStatus,
}

impl From<GlucoseRecord> for RecordDto {
    fn from(record: GlucoseRecord) -> Self {
        let status = record.status();
        Self { record, status }
    }
}

/// List of records
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordListResponse {
    /// Records, newest first
    pub records: Vec<RecordDto>,
    /// Total count
    pub total: usize,
}

impl RecordListResponse {
    pub fn new(records: Vec<GlucoseRecord>) -> Self {
        let total = records.len();
        Self {
            records: records.into_iter().map(RecordDto::from).collect(),
            total,
        }
    }
}

/// Save response
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveRecordResponse {
    /// "inserted" or "updated"
    pub status: String,
    pub record: RecordDto,
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRecordResponse {
    pub id: String,
    /// False when the id did not exist
    pub removed: bool,
}

/// Freshly generated id
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// Inclusive range query parameters (ms since epoch)
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: i64,
    pub end: i64,
}

// ============================================
// REPORT DTOs
// ============================================

/// Report query parameters
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    /// today, 7days or 30days (default: 7days)
    #[serde(default)]
    pub window: Option<String>,
}

// ============================================
// FOOD DTOs
// ============================================

/// Food recognition request
#[derive(Debug, Deserialize)]
pub struct RecognizeRequest {
    /// Image URI or path
    pub image: String,
    /// Daily budget to assess the meal against (default: male)
    #[serde(default)]
    pub gender: Gender,
}

/// Recognition envelope plus the diet-guide assessment of a recognised meal
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognizeResponse {
    #[serde(flatten)]
    pub result: RecognitionResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<MealAssessment>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Records currently stored (0 if storage is unreadable)
    pub record_count: usize,
    /// Recognition backend name
    pub recognizer: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
