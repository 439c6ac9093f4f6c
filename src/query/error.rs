//! Query error types

use thiserror::Error;

/// Errors that can occur while building a query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Report window name not recognised
    #[error("Invalid report window: {0} (expected today, 7days or 30days)")]
    InvalidWindow(String),

    /// Range start after range end
    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidTimeRange { start: i64, end: i64 },

    /// Timestamp outside the representable calendar
    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
