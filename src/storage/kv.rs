//! Key-value stores holding serialized collections
//!
//! Each collection lives under one fixed key as a single text blob. Writes
//! replace the whole value; there are no partial updates and no
//! transactions spanning several keys.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{FolioError, FolioResult};

use super::file_io::{read_text, write_text_atomic};

/// Storage backend for whole serialized collections
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> FolioResult<Option<String>>;

    /// Overwrite the value stored under `key`
    ///
    /// A rejected write (for example an exhausted quota) must be reported
    /// as an error and leave the previous value in place.
    fn set(&self, key: &str, value: &str) -> FolioResult<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> FolioResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(FolioError::Storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> FolioResult<Option<String>> {
        read_text(self.path_for(key)?)
    }

    fn set(&self, key: &str, value: &str) -> FolioResult<()> {
        write_text_atomic(self.path_for(key)?, value)
    }
}

/// In-process store with an optional total size quota
///
/// Mirrors the behaviour of browser storage: once the quota would be
/// exceeded, the write is refused and the old value kept.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses writes once `quota_bytes` would be exceeded
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FolioResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| FolioError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FolioResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FolioError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(quota) = self.quota_bytes {
            let others: usize = data
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(FolioError::StorageFull(format!(
                    "writing '{}' needs {} bytes but the quota is {} bytes",
                    key, needed, quota
                )));
            }
        }

        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
