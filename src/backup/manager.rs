//! Backup manager for Folio
//!
//! Handles rolling backups with configurable retention policies.
//! Backups are stored as `backup-YYYYMMDD-HHMMSS-mmm.json` files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::config::settings::BackupRetention;
use crate::error::{FolioError, FolioResult};
use crate::export::Backup;
use crate::storage::Storage;

/// Metadata about a backup file
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Taken from the filename
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Whether this is a monthly backup (kept longer)
    pub is_monthly: bool,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(backup_dir: PathBuf, retention: BackupRetention) -> Self {
        Self {
            backup_dir,
            retention,
        }
    }

    /// Write a backup of both collections
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self, storage: &Storage) -> FolioResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| FolioError::Io(format!("Failed to create backup directory: {}", e)))?;

        let backup = Backup::from_storage(storage)?;
        let now = backup.export_date;
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let json = serde_json::to_string_pretty(&backup)
            .map_err(|e| FolioError::Json(format!("Failed to serialize backup: {}", e)))?;
        fs::write(&backup_path, json)
            .map_err(|e| FolioError::Io(format!("Failed to write backup file: {}", e)))?;

        tracing::info!(path = %backup_path.display(), "Created backup");
        Ok(backup_path)
    }

    /// Create a backup and then enforce the retention policy
    pub fn create_backup_with_retention(
        &self,
        storage: &Storage,
    ) -> FolioResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup(storage)?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> FolioResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| FolioError::Io(format!("Failed to read backup directory: {}", e)))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| FolioError::Io(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Delete backups beyond the retention limits
    pub fn enforce_retention(&self) -> FolioResult<Vec<PathBuf>> {
        let (monthly, daily): (Vec<_>, Vec<_>) =
            self.list_backups()?.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        let mut deleted = Vec::new();
        for backup in expired {
            fs::remove_file(&backup.path)
                .map_err(|e| FolioError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        if !deleted.is_empty() {
            tracing::debug!(count = deleted.len(), "Pruned old backups");
        }
        Ok(deleted)
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn latest_backup(&self) -> FolioResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        is_monthly: created_at.day() == 1,
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS` with an optional `-mmm` millisecond suffix
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let mut parts = stamp.split('-');
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    let millis = match parts.next() {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;
    let time = NaiveTime::parse_from_str(time_part, "%H%M%S").ok()?;
    let time = time.with_nanosecond(millis * 1_000_000)?;
    Some(NaiveDateTime::new(date, time).and_utc())
}
