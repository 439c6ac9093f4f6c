//! Glucolog Storage
//!
//! This module provides the persisted record collection:
//!
//! - **types**: Core data structures (GlucoseRecord, MealTiming, GlucoseStatus, TimeRange)
//! - **kv**: Key-value persistence backends (file, memory)
//! - **store**: The record store, CRUD over the whole collection
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   GlucoseRecord → validate → lock → load blob → upsert → sort → write blob
//!
//! Read Path:
//!   load blob → decode → Vec<GlucoseRecord> (newest first)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use glucolog::storage::{GlucoseRecord, MealTiming, RecordStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = RecordStore::open(&StoreConfig::new("./data"))?;
//!
//!     let saved = store.save(GlucoseRecord::new(6.2, MealTiming::BeforeMeal)).await;
//!     assert!(saved);
//!
//!     let week = store.get_last_7_days_records().await;
//!     println!("{} readings this week", week.len());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult, ValidationError};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use store::{generate_id, RecordStore, SaveOutcome, StoreConfig, DEFAULT_STORAGE_KEY};
pub use types::{
    parse_glucose_value, validate_value, GlucoseRecord, GlucoseStatus, MealTiming, TimeRange,
};
