//! Combined backup document
//!
//! Bundles both collections with an export timestamp and a format version:
//! `{"projects": [...], "financeEntries": [...], "exportDate": ..., "version": ...}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::FolioResult;
use crate::models::{FinanceEntry, Project};
use crate::storage::Storage;

use super::json::write_pretty;

/// Format version written into new backups
pub const BACKUP_FORMAT_VERSION: &str = "2.0";

/// Full backup of both collections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub projects: Vec<Project>,
    pub finance_entries: Vec<FinanceEntry>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl Backup {
    pub fn new(projects: Vec<Project>, finance_entries: Vec<FinanceEntry>) -> Self {
        Self {
            projects,
            finance_entries,
            export_date: Utc::now(),
            version: BACKUP_FORMAT_VERSION.to_string(),
        }
    }

    /// Capture the current state of both collections
    pub fn from_storage(storage: &Storage) -> FolioResult<Self> {
        let projects = storage.projects.snapshot()?;
        let entries = storage.finance.snapshot()?;
        Ok(Self::new(projects.as_ref().clone(), entries.as_ref().clone()))
    }
}

/// Write a combined backup of `storage`
pub fn export_backup<W: Write>(storage: &Storage, writer: &mut W) -> FolioResult<Backup> {
    let backup = Backup::from_storage(storage)?;
    write_pretty(&backup, writer)?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use chrono::NaiveDate;

    #[test]
    fn test_backup_wire_format() {
        let storage = Storage::in_memory();
        storage.projects.replace(vec![Project::new("Site")]).unwrap();
        storage
            .finance
            .replace(vec![FinanceEntry::new(
                EntryType::Expense,
                3.0,
                "Food",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap()])
            .unwrap();

        let mut output = Vec::new();
        let backup = export_backup(&storage, &mut output).unwrap();
        assert_eq!(backup.projects.len(), 1);

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["projects"].as_array().unwrap().len(), 1);
        assert_eq!(value["financeEntries"].as_array().unwrap().len(), 1);
        assert_eq!(value["version"], BACKUP_FORMAT_VERSION);
        assert!(value["exportDate"].is_string());
    }
}
