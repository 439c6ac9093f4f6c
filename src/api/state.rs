//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::nutrition::{FoodRecognizer, MockFoodRecognizer};
use crate::storage::RecordStore;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store backing every record and report endpoint
    pub store: Arc<RecordStore>,
    /// Food recognition backend
    pub recognizer: Arc<dyn FoodRecognizer>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the mock recognizer
    pub fn new(store: Arc<RecordStore>, config: ApiConfig) -> Self {
        Self::with_recognizer(store, Arc::new(MockFoodRecognizer::default()), config)
    }

    /// Create AppState with a specific recognition backend
    pub fn with_recognizer(
        store: Arc<RecordStore>,
        recognizer: Arc<dyn FoodRecognizer>,
        config: ApiConfig,
    ) -> Self {
        Self {
            store,
            recognizer,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Current wall-clock time in ms since epoch
    pub fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Upper bound for one food recognition call
    pub recognition_timeout_ms: u64,
    /// Allowed CORS origins (empty: allow any)
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8090,
            request_timeout_ms: 30_000,
            max_body_size: 1024 * 1024, // 1MB
            recognition_timeout_ms: 10_000,
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn recognition_timeout(&self) -> Duration {
        Duration::from_millis(self.recognition_timeout_ms)
    }
}
