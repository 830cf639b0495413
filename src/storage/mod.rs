//! Storage layer for Folio
//!
//! Two independent collections (projects and finance entries) are kept as
//! whole serialized blobs under fixed keys of a [`KeyValueStore`]. There is
//! no transaction across the two keys: writing both is simply two
//! sequential single-collection writes.

pub mod file_io;
pub mod kv;
pub mod migrate;
pub mod repository;
pub mod schema;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::Repository;
pub use schema::{Record, SCHEMA_VERSION};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::paths::FolioPaths;
use crate::error::FolioError;
use crate::models::{FinanceEntry, Project};

/// Storage key of the project collection
pub const PROJECTS_KEY: &str = "project-tracker-data";

/// Storage key of the finance entry collection
pub const FINANCE_KEY: &str = "finance-tracker-data";

/// Main storage coordinator that provides access to both repositories
pub struct Storage {
    pub projects: Repository<Project>,
    pub finance: Repository<FinanceEntry>,
    backup_dir: Option<PathBuf>,
}

impl Storage {
    /// Create storage over an arbitrary key-value store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            projects: Repository::new(PROJECTS_KEY, Arc::clone(&store)),
            finance: Repository::new(FINANCE_KEY, store),
            backup_dir: None,
        }
    }

    /// File-backed storage rooted at the configured data directory
    pub fn open(paths: &FolioPaths) -> Result<Self, FolioError> {
        paths.ensure_directories()?;

        let store = Arc::new(FileStore::new(paths.data_dir()));
        Ok(Self::new(store).with_backup_dir(paths.backup_dir()))
    }

    /// Volatile storage, useful for tests
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Enable safety backups before destructive restores
    pub fn with_backup_dir(mut self, dir: PathBuf) -> Self {
        self.backup_dir = Some(dir);
        self
    }

    pub fn backup_dir(&self) -> Option<&Path> {
        self.backup_dir.as_deref()
    }

    /// Load both collections from the store
    pub fn load_all(&self) -> Result<(), FolioError> {
        let projects = self.projects.load()?;
        let entries = self.finance.load()?;
        tracing::debug!(projects, entries, "Loaded collections");
        Ok(())
    }
}
