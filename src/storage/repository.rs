//! Collection repository
//!
//! Holds the authoritative in-memory copy of one collection. Readers get an
//! immutable snapshot; the only way to change the collection is to replace
//! it wholesale, which persists the new value before publishing it.

use std::sync::{Arc, RwLock};

use crate::error::{FolioError, FolioResult};

use super::kv::KeyValueStore;
use super::schema::{decode_collection, encode_collection, Record};

/// Repository for one persisted collection
pub struct Repository<T> {
    key: &'static str,
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Arc<Vec<T>>>,
}

impl<T: Record> Repository<T> {
    pub fn new(key: &'static str, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key,
            store,
            data: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Storage key this collection lives under
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read the persisted collection
    ///
    /// Never fails: a missing value is an empty collection, and an
    /// unreadable or corrupt value is logged and also treated as empty.
    pub fn read_persisted(&self) -> Vec<T> {
        let text = match self.store.get(self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Failed to read {} collection", T::KIND);
                return Vec::new();
            }
        };

        match decode_collection(&text) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    key = self.key,
                    error = %e,
                    "Stored {} collection is corrupt, starting empty",
                    T::KIND
                );
                Vec::new()
            }
        }
    }

    /// Refresh the in-memory snapshot from the store
    pub fn load(&self) -> FolioResult<usize> {
        let items = self.read_persisted();
        let count = items.len();
        self.publish(items)?;
        Ok(count)
    }

    /// Current read-only view of the collection
    pub fn snapshot(&self) -> FolioResult<Arc<Vec<T>>> {
        let data = self
            .data
            .read()
            .map_err(|e| FolioError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(Arc::clone(&data))
    }

    pub fn count(&self) -> FolioResult<usize> {
        Ok(self.snapshot()?.len())
    }

    /// Persist `items` and make them the current collection
    ///
    /// If the store rejects the write, the error is returned and neither the
    /// persisted value nor the in-memory snapshot changes.
    pub(crate) fn replace(&self, items: Vec<T>) -> FolioResult<()> {
        let text = encode_collection(&items)?;
        self.store.set(self.key, &text)?;
        self.publish(items)
    }

    fn publish(&self, items: Vec<T>) -> FolioResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FolioError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = Arc::new(items);
        Ok(())
    }
}
