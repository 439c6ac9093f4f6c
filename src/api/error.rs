//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::nutrition::RecognitionError;
use crate::storage::StorageError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query parameter error
    #[error("Query error: {0}")]
    Query(#[from] crate::query::QueryError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Food recognition error
    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Query(_) => (StatusCode::BAD_REQUEST, "QUERY_ERROR"),
            ApiError::Storage(e) => match e {
                StorageError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                StorageError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "STORAGE_TIMEOUT"),
                StorageError::Corruption(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_CORRUPT")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            },
            ApiError::Recognition(e) => match e {
                RecognitionError::InvalidImage(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                RecognitionError::Timeout(_) => {
                    (StatusCode::GATEWAY_TIMEOUT, "RECOGNITION_TIMEOUT")
                }
                _ => (StatusCode::SERVICE_UNAVAILABLE, "RECOGNITION_UNAVAILABLE"),
            },
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ValidationError;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(StorageError::Validation(ValidationError::NonPositive(-1.0)));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);

        let err = ApiError::from(StorageError::Timeout(Duration::from_secs(5)));
        assert_eq!(err.status_and_code(), (StatusCode::GATEWAY_TIMEOUT, "STORAGE_TIMEOUT"));

        let err = ApiError::from(RecognitionError::Unsuccessful);
        assert_eq!(err.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::NotFound("record x".to_string());
        assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);
    }
}
