//! Key-value persistence backends
//!
//! The record store keeps its whole collection under a single key, so a
//! backend only needs whole-value get/set/remove. Writes must be
//! all-or-nothing: a reader sees either the previous value or the new one.
//!
//! - `FileKeyValueStore`: one file per key, replaced via a per-write temp file + fsync + rename
//! - `MemoryKeyValueStore`: in-process map, for tests and embedding

use crate::storage::error::StorageResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Async whole-value key-value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if absent
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Atomically replace the value under `key`
    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Remove `key`; removing an absent key succeeds
    async fn remove(&self, key: &str) -> StorageResult<()>;
}

/// File-backed store: each key lives in `<dir>/<sanitized key>.json`
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// File path holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// Fresh temp path next to `path`. Every write gets its own, so
    /// overlapping writers never share a file.
    fn temp_path_for(path: &Path) -> PathBuf {
        path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()))
    }

    async fn write_replace(path: &Path, tmp_path: &Path, value: &str) -> StorageResult<()> {
        let mut file = tokio::fs::File::create(tmp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(tmp_path, path).await?;
        Ok(())
    }
}

/// Map a key to a safe file stem (`@blood_sugar_records` -> `_blood_sugar_records`)
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let path = self.path_for(key);
        let tmp_path = Self::temp_path_for(&path);

        let result = Self::write_replace(&path, &tmp_path, &value).await;
        if result.is_err() {
            // Leave the previous value untouched
            let _ = tokio::fs::remove_file(&tmp_path).await;
        }
        result
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn leftover_temp_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "tmp"))
            .collect()
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("@blood_sugar_records"), "_blood_sugar_records");
        assert_eq!(sanitize_key("a/b"), "a_b");
        assert_eq!(sanitize_key("plain-key_1"), "plain-key_1");
    }

    #[tokio::test]
    async fn test_file_store_get_missing() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();

        assert_eq!(store.get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_set_replaces_value() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();

        store.set("k", "first".to_string()).await.unwrap();
        store.set("k", "second".to_string()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));

        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();

        {
            let store = FileKeyValueStore::open(dir.path()).unwrap();
            store.set("@records", "[]".to_string()).await.unwrap();
        }

        let store = FileKeyValueStore::open(dir.path()).unwrap();
        assert_eq!(store.get("@records").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_file_store_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();

        store.set("k", "v".to_string()).await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_failed_write_cleans_up() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();

        // A non-empty directory in place of the target makes the rename fail
        let target = store.path_for("k");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        assert!(store.set("k", "new".to_string()).await.is_err());
        assert!(leftover_temp_files(dir.path()).is_empty());
        assert_eq!(std::fs::read_to_string(target.join("keep")).unwrap(), "x");
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let path = Path::new("/data/_records.json");
        let a = FileKeyValueStore::temp_path_for(path);
        let b = FileKeyValueStore::temp_path_for(path);

        assert_ne!(a, b);
        assert_eq!(a.parent(), path.parent());
        assert_eq!(a.extension().unwrap(), "tmp");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_store_concurrent_sets_never_tear() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FileKeyValueStore::open(dir.path()).unwrap());

        for round in 0..10 {
            let values: Vec<String> = (0..8u8)
                .map(|i| {
                    let c = char::from(b'a' + i);
                    c.to_string().repeat(100_000 + usize::from(i) * 25_000)
                })
                .collect();

            let handles: Vec<_> = values
                .iter()
                .cloned()
                .map(|value| {
                    let store = Arc::clone(&store);
                    tokio::spawn(async move { store.set("k", value).await })
                })
                .collect();

            for handle in handles {
                handle.await.unwrap().unwrap();
            }

            let stored = store.get("k").await.unwrap().unwrap();
            assert!(
                values.contains(&stored),
                "round {}: stored blob is not one writer's value (len {})",
                round,
                stored.len()
            );
        }

        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
