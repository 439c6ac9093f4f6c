//! Glucose Record Store
//!
//! Durable CRUD over the whole record collection, persisted as one JSON blob
//! under a single key:
//! - Read path: Backend → JSON array → `Vec<GlucoseRecord>`
//! - Write path: Load all → replace/append/remove → sort newest first → write all
//!
//! Every mutation is a full read-modify-write of the collection. Mutations are
//! serialized through an async mutex so concurrent callers cannot lose each
//! other's updates. Reads are bounded by a timeout. A write runs as its own
//! task that owns the mutex guard, so the lock is only released once the
//! backend has finished, even if the caller gives up first.

use crate::query;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use crate::storage::types::GlucoseRecord;
use chrono::{Local, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Key the collection is stored under
pub const DEFAULT_STORAGE_KEY: &str = "@blood_sugar_records";

/// Configuration for the record store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for the file backend
    pub data_dir: PathBuf,
    /// Key holding the serialized collection
    pub storage_key: String,
    /// Upper bound for a backend read in milliseconds (default: 5000).
    /// Writes that run longer are logged and awaited.
    pub operation_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("glucolog_data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            operation_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

/// Whether `save` added a new record or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Generate a record id: current milliseconds followed by a 9-character random suffix.
///
/// Collisions are not detected. Saving a record whose id collides with an
/// existing one replaces that record.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("{}{}", millis, suffix)
}

/// Newest first. Stable, so equal timestamps keep their insertion order.
fn sort_newest_first(records: &mut [GlucoseRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// The glucose record store
pub struct RecordStore {
    /// Persistence backend
    backend: Arc<dyn KeyValueStore>,
    /// Key holding the collection
    key: String,
    /// Bound for reads; warning threshold for writes
    timeout: Duration,
    /// Serializes read-modify-write cycles
    write_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    /// Open a file-backed store
    pub fn open(config: &StoreConfig) -> StorageResult<Self> {
        let backend = FileKeyValueStore::open(&config.data_dir)?;
        tracing::info!("Record store opened at {:?}", config.data_dir);
        Ok(Self::with_backend(Arc::new(backend), config))
    }

    /// Build a store over any backend
    pub fn with_backend(backend: Arc<dyn KeyValueStore>, config: &StoreConfig) -> Self {
        Self {
            backend,
            key: config.storage_key.clone(),
            timeout: config.operation_timeout(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build a store backed by memory only
    pub fn in_memory() -> Self {
        Self::with_backend(
            Arc::new(MemoryKeyValueStore::new()),
            &StoreConfig::default(),
        )
    }

    async fn lock_writes(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.write_lock).lock_owned().await
    }

    async fn load(&self) -> StorageResult<Vec<GlucoseRecord>> {
        let raw = tokio::time::timeout(self.timeout, self.backend.get(&self.key))
            .await
            .map_err(|_| StorageError::Timeout(self.timeout))??;

        match raw {
            None => Ok(Vec::new()),
            Some(blob) if blob.trim().is_empty() => Ok(Vec::new()),
            Some(blob) => serde_json::from_str(&blob)
                .map_err(|e| StorageError::Corruption(format!("{}: {}", self.key, e))),
        }
    }

    /// Write the collection and release `guard` once the backend is done.
    ///
    /// The result is always the backend's own answer: a write that overruns
    /// the timeout is waited for rather than reported as failed.
    async fn persist(
        &self,
        records: &[GlucoseRecord],
        guard: OwnedMutexGuard<()>,
    ) -> StorageResult<()> {
        let blob = serde_json::to_string(records)?;
        let backend = Arc::clone(&self.backend);
        let key = self.key.clone();

        let mut write = tokio::spawn(async move {
            let result = backend.set(&key, blob).await;
            drop(guard);
            result
        });

        let joined = match tokio::time::timeout(self.timeout, &mut write).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(
                    key = %self.key,
                    timeout = ?self.timeout,
                    "Storage write is slow, waiting for it to finish"
                );
                write.await
            }
        };

        joined.map_err(|e| StorageError::Task(e.to_string()))?
    }

    // ------------------------------------------------------------------
    // Strict operations
    // ------------------------------------------------------------------

    /// Load every record, newest first
    pub async fn try_get_all(&self) -> StorageResult<Vec<GlucoseRecord>> {
        self.load().await
    }

    /// Insert or replace a record by id
    pub async fn try_save(&self, record: GlucoseRecord) -> StorageResult<SaveOutcome> {
        record.validate()?;

        let guard = self.lock_writes().await;
        let mut records = self.load().await?;

        let id = record.id.clone();
        let outcome = match records.iter().position(|r| r.id == record.id) {
            Some(idx) => {
                records[idx] = record;
                SaveOutcome::Updated
            }
            None => {
                records.push(record);
                SaveOutcome::Inserted
            }
        };

        sort_newest_first(&mut records);
        self.persist(&records, guard).await?;

        tracing::debug!(record_id = %id, outcome = ?outcome, total = records.len(), "Record saved");
        Ok(outcome)
    }

    /// Edit an existing record in place under the write lock.
    ///
    /// `id` and `timestamp` are restored after `edit` runs. Returns the updated
    /// record, or `None` if no record has that id.
    pub async fn try_update<F>(&self, id: &str, edit: F) -> StorageResult<Option<GlucoseRecord>>
    where
        F: FnOnce(&mut GlucoseRecord),
    {
        let guard = self.lock_writes().await;
        let mut records = self.load().await?;

        let Some(idx) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let mut updated = records[idx].clone();
        edit(&mut updated);
        updated.id = records[idx].id.clone();
        updated.timestamp = records[idx].timestamp;
        updated.validate()?;

        records[idx] = updated.clone();
        self.persist(&records, guard).await?;

        tracing::debug!(record_id = %id, "Record updated");
        Ok(Some(updated))
    }

    /// Remove a record by id; returns whether anything was removed
    pub async fn try_delete_by_id(&self, id: &str) -> StorageResult<bool> {
        let guard = self.lock_writes().await;
        let records = self.load().await?;

        let before = records.len();
        let remaining: Vec<GlucoseRecord> = records.into_iter().filter(|r| r.id != id).collect();
        let removed = remaining.len() != before;

        self.persist(&remaining, guard).await?;

        tracing::debug!(record_id = %id, removed, total = remaining.len(), "Record deleted");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Boolean surface
    // ------------------------------------------------------------------

    /// All records, newest first. Read failures degrade to an empty list.
    pub async fn get_all(&self) -> Vec<GlucoseRecord> {
        match self.load().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load glucose records");
                Vec::new()
            }
        }
    }

    /// Insert or replace a record. Returns false on validation, read or write failure.
    pub async fn save(&self, record: GlucoseRecord) -> bool {
        match self.try_save(record).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save glucose record");
                false
            }
        }
    }

    /// Delete a record by id. Deleting an unknown id succeeds.
    pub async fn delete_by_id(&self, id: &str) -> bool {
        match self.try_delete_by_id(id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(record_id = %id, error = %e, "Failed to delete glucose record");
                false
            }
        }
    }

    /// Fresh record id
    pub fn generate_id(&self) -> String {
        generate_id()
    }

    // ------------------------------------------------------------------
    // Query surface
    // ------------------------------------------------------------------

    /// Records with `start <= timestamp <= end`
    pub async fn get_records_by_date_range(&self, start: i64, end: i64) -> Vec<GlucoseRecord> {
        query::by_range(&self.get_all().await, start, end)
    }

    /// Records from today's local midnight until the next
    pub async fn get_today_records(&self) -> Vec<GlucoseRecord> {
        let now = Utc::now().timestamp_millis();
        query::today(&self.get_all().await, now, &Local)
    }

    /// Records from the last seven days
    pub async fn get_last_7_days_records(&self) -> Vec<GlucoseRecord> {
        self.get_last_n_days_records(7).await
    }

    /// Records from the last `n` days
    pub async fn get_last_n_days_records(&self, n: i64) -> Vec<GlucoseRecord> {
        let now = Utc::now().timestamp_millis();
        query::last_n_days(&self.get_all().await, n, now)
    }
}
