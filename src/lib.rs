//! # Glucolog
//!
//! Personal blood-glucose log: a local record store, time-window queries and
//! trend reports, served over a small REST API.
//!
//! ## Features
//!
//! - **Durable record store**: the whole collection is one JSON blob, replaced atomically
//! - **Window queries**: today (local calendar day), last N days, arbitrary ranges
//! - **Reports**: average, extremes, status counts and a deduplicated chart series
//! - **Meal recognition**: pluggable food-photo recognizer with a mock backend
//!
//! ## Modules
//!
//! - [`storage`]: Record types, validation and the record store
//! - [`query`]: Pure window selection over record collections
//! - [`report`]: Summary statistics and chart data
//! - [`nutrition`]: Food recognition capability
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glucolog::storage::*;
//! use glucolog::query::ReportWindow;
//! use glucolog::report::Report;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = RecordStore::open(&StoreConfig::new("./glucolog_data"))?;
//!
//!     store
//!         .try_save(GlucoseRecord::new(6.4, MealTiming::BeforeMeal).notes("fasting"))
//!         .await?;
//!
//!     let records = store.try_get_all().await?;
//!     let now = chrono::Utc::now().timestamp_millis();
//!     let report = Report::generate(&records, ReportWindow::Last7Days, now, &chrono::Local);
//!
//!     println!("Average over 7 days: {}", report.stats.average);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod nutrition;
pub mod query;
pub mod report;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    GlucoseRecord, GlucoseStatus, MealTiming, RecordStore, StorageError, StorageResult,
    StoreConfig, TimeRange,
};

pub use query::{Granularity, QueryError, ReportWindow};

pub use report::{Advisory, ChartData, Report, SummaryStats};

pub use nutrition::{FoodRecognizer, MockFoodRecognizer, NutritionFacts, RecognitionError};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
