//! Storage layer error types
//!
//! Defines all errors that can occur in the record store and its backends.

use std::time::Duration;
use thiserror::Error;

/// Reasons a glucose reading is rejected before it reaches the store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Input could not be parsed as a number
    #[error("Not a number: {0:?}")]
    NotANumber(String),

    /// Value is NaN or infinite
    #[error("Glucose value must be a finite number")]
    NotFinite,

    /// Value is zero or negative
    #[error("Glucose value must be greater than zero, got {0}")]
    NonPositive(f64),

    /// Value is above any reading a meter can report
    #[error("Glucose value {0} is above the plausible maximum of 200 mmol/L")]
    Implausible(f64),

    /// Record id is blank
    #[error("Record id must not be empty")]
    EmptyId,

    /// Meal timing is neither before_meal nor after_meal
    #[error("Unknown meal timing: {0}")]
    UnknownMealTiming(String),
}

/// Errors that can occur in the record store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Persisted blob could not be decoded
    #[error("Corrupt data: {0}")]
    Corruption(String),

    /// Backend did not answer in time
    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),

    /// Record failed validation
    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    /// Write task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Validation(ValidationError::NonPositive(-1.0));
        assert_eq!(
            err.to_string(),
            "Invalid record: Glucose value must be greater than zero, got -1"
        );

        let err = StorageError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Storage operation timed out after 250ms");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }
}
