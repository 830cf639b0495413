//! Import service
//!
//! Parses finance CSV/JSON, project JSON and combined backups, then merges
//! the parsed records into storage. Parsing is all-or-nothing: a malformed
//! file is reported with a readable message and nothing is written.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;

use crate::backup::BackupManager;
use crate::config::settings::BackupRetention;
use crate::error::{FolioError, FolioResult};
use crate::export::FINANCE_CSV_HEADER;
use crate::models::{EntryId, EntryType, FinanceEntry, Project, ProjectId};
use crate::storage::schema::{decode_items, Record, LEGACY_SCHEMA_VERSION, SCHEMA_VERSION};
use crate::storage::{Repository, Storage};

/// How imported records combine with an existing collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep existing records and add the imported ones after them
    Append,
    /// Discard existing records in favour of the imported ones
    Replace,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => write!(f, "append"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            other => Err(FolioError::Validation(format!(
                "Unknown merge policy '{}': expected append or replace",
                other
            ))),
        }
    }
}

/// Per-collection merge policies for a combined backup restore
///
/// The default restores projects by replacement and finance entries by
/// appending, which is how backups have always been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    pub projects: MergePolicy,
    pub finance: MergePolicy,
}

impl RestoreOptions {
    /// Replace both collections, so restoring the same backup twice is a no-op
    pub fn replace_all() -> Self {
        Self {
            projects: MergePolicy::Replace,
            finance: MergePolicy::Replace,
        }
    }
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            projects: MergePolicy::Replace,
            finance: MergePolicy::Append,
        }
    }
}

/// Result of merging one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Imported records whose id clashed and was replaced by a fresh one
    pub reassigned_ids: usize,
    /// Size of the collection after the merge
    pub total: usize,
    pub policy: MergePolicy,
}

/// Result of a combined backup restore
#[derive(Debug, Clone, Default)]
pub struct RestoreSummary {
    pub projects: Option<ImportSummary>,
    pub finance: Option<ImportSummary>,
    /// Backup taken before an existing collection was replaced
    pub safety_backup: Option<PathBuf>,
}

/// Parsed contents of a combined backup
///
/// A member that is missing, or is not an array, is `None` and leaves the
/// corresponding collection alone.
#[derive(Debug, Clone, Default)]
pub struct BackupImport {
    pub projects: Option<Vec<Project>>,
    pub finance_entries: Option<Vec<FinanceEntry>>,
}

/// Parse finance entries from CSV text
///
/// Expects the `Date,Type,Category,Amount,Description` header. Every row
/// must have 4 or 5 fields; a bad date, type or amount aborts the whole
/// import. Imported entries always get fresh ids.
pub fn parse_finance_csv(text: &str) -> FolioResult<Vec<FinanceEntry>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let header_ok = headers.len() >= 4
        && headers.len() <= FINANCE_CSV_HEADER.len()
        && headers
            .iter()
            .zip(FINANCE_CSV_HEADER)
            .all(|(found, expected)| found.trim().eq_ignore_ascii_case(expected));
    if !header_ok {
        return Err(FolioError::Import(format!(
            "Missing or unrecognized header row: expected {}",
            FINANCE_CSV_HEADER.join(",")
        )));
    }

    let mut entries = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() < 4 || record.len() > 5 {
            return Err(FolioError::Import(format!(
                "Row {}: expected 4 or 5 columns, found {}",
                row,
                record.len()
            )));
        }

        let date = NaiveDate::parse_from_str(record[0].trim(), "%Y-%m-%d").map_err(|_| {
            FolioError::Import(format!("Row {}: invalid date '{}'", row, &record[0]))
        })?;
        let entry_type: EntryType = record[1]
            .parse()
            .map_err(|e| FolioError::Import(format!("Row {}: {}", row, e)))?;
        let amount: f64 = record[3].trim().parse().map_err(|_| {
            FolioError::Import(format!("Row {}: invalid amount '{}'", row, &record[3]))
        })?;
        let description = record.get(4).unwrap_or_default();

        let entry = FinanceEntry::new(entry_type, amount, &record[2], date)
            .map_err(|e| FolioError::Import(format!("Row {}: {}", row, e)))?
            .with_description(description);
        entries.push(entry);
    }

    Ok(entries)
}

/// Parse finance entries from a JSON array
pub fn parse_finance_json(text: &str) -> FolioResult<Vec<FinanceEntry>> {
    let items = parse_array(text, "finance entries")?;
    let entries: Vec<FinanceEntry> = decode_items(items, SCHEMA_VERSION).map_err(into_import)?;
    validate_all(&entries, FinanceEntry::validate)?;
    Ok(entries)
}

/// Parse projects from a JSON array, upgrading older record shapes
pub fn parse_projects_json(text: &str) -> FolioResult<Vec<Project>> {
    let items = parse_array(text, "projects")?;
    decode_projects(items)
}

/// Parse a combined backup document
pub fn parse_backup(text: &str) -> FolioResult<BackupImport> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| FolioError::Import(format!("Invalid backup file format: {}", e)))?;
    let Value::Object(mut map) = value else {
        return Err(FolioError::Import(
            "Invalid backup file format: expected a JSON object".into(),
        ));
    };

    let projects = match take_array(&mut map, "projects") {
        Some(items) => Some(decode_projects(items)?),
        None => None,
    };
    let finance_entries = match take_array(&mut map, "financeEntries") {
        Some(items) => {
            let entries: Vec<FinanceEntry> =
                decode_items(items, SCHEMA_VERSION).map_err(into_import)?;
            validate_all(&entries, FinanceEntry::validate)?;
            Some(entries)
        }
        None => None,
    };

    Ok(BackupImport {
        projects,
        finance_entries,
    })
}

fn parse_array(text: &str, what: &str) -> FolioResult<Vec<Value>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| FolioError::Import(format!("Failed to parse JSON file: {}", e)))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(FolioError::Import(format!(
            "Invalid JSON format: expected an array of {}",
            what
        ))),
    }
}

fn take_array(map: &mut serde_json::Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    match map.remove(key) {
        Some(Value::Array(items)) => Some(items),
        Some(Value::Null) | None => None,
        Some(_) => {
            tracing::warn!(member = key, "Backup member is not an array, ignoring it");
            None
        }
    }
}

fn decode_projects(items: Vec<Value>) -> FolioResult<Vec<Project>> {
    let projects: Vec<Project> = decode_items(items, LEGACY_SCHEMA_VERSION).map_err(into_import)?;
    validate_all(&projects, Project::validate)?;
    Ok(projects)
}

fn validate_all<T>(items: &[T], validate: impl Fn(&T) -> FolioResult<()>) -> FolioResult<()> {
    for (index, item) in items.iter().enumerate() {
        validate(item).map_err(|e| FolioError::Import(format!("Record {}: {}", index, e)))?;
    }
    Ok(())
}

fn into_import(err: FolioError) -> FolioError {
    match err {
        FolioError::Import(_) => err,
        other => FolioError::Import(other.to_string()),
    }
}

/// Records whose id can be replaced when it collides
trait Reidentify: Record {
    fn id_str(&self) -> &str;
    fn reassign_id(&mut self);
}

impl Reidentify for FinanceEntry {
    fn id_str(&self) -> &str {
        self.id.as_str()
    }

    fn reassign_id(&mut self) {
        self.id = EntryId::new();
    }
}

impl Reidentify for Project {
    fn id_str(&self) -> &str {
        self.id.as_str()
    }

    fn reassign_id(&mut self) {
        self.id = ProjectId::new();
    }
}

/// Service applying parsed imports to storage
pub struct ImportService<'a> {
    storage: &'a Storage,
    retention: BackupRetention,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            retention: BackupRetention::default(),
        }
    }

    /// Retention applied to safety backups taken before a replace
    pub fn with_retention(mut self, retention: BackupRetention) -> Self {
        self.retention = retention;
        self
    }

    /// Append imported finance entries to the collection
    pub fn import_finance(&self, entries: Vec<FinanceEntry>) -> FolioResult<ImportSummary> {
        let summary = merge_into(&self.storage.finance, entries, MergePolicy::Append)?;
        tracing::info!(imported = summary.imported, "Imported finance entries");
        Ok(summary)
    }

    /// Apply imported projects with the given policy
    pub fn import_projects(
        &self,
        projects: Vec<Project>,
        policy: MergePolicy,
    ) -> FolioResult<ImportSummary> {
        let replaces_data = policy == MergePolicy::Replace && self.storage.projects.count()? > 0;
        let safety_backup = self.safety_backup_if(replaces_data)?;
        let summary = merge_into(&self.storage.projects, projects, policy)?;
        tracing::info!(
            imported = summary.imported,
            policy = %policy,
            safety_backup = ?safety_backup,
            "Imported projects"
        );
        Ok(summary)
    }

    /// Apply a parsed combined backup
    ///
    /// The two collections are written one after the other; if the second
    /// write fails, the first stays applied.
    pub fn restore_backup(
        &self,
        backup: BackupImport,
        options: RestoreOptions,
    ) -> FolioResult<RestoreSummary> {
        let mut summary = RestoreSummary::default();

        let replaces_projects = backup.projects.is_some()
            && options.projects == MergePolicy::Replace
            && self.storage.projects.count()? > 0;
        let replaces_finance = backup.finance_entries.is_some()
            && options.finance == MergePolicy::Replace
            && self.storage.finance.count()? > 0;
        summary.safety_backup = self.safety_backup_if(replaces_projects || replaces_finance)?;

        if let Some(projects) = backup.projects {
            summary.projects = Some(merge_into(&self.storage.projects, projects, options.projects)?);
        }
        if let Some(entries) = backup.finance_entries {
            summary.finance = Some(merge_into(&self.storage.finance, entries, options.finance)?);
        }

        tracing::info!(
            projects = ?summary.projects.as_ref().map(|s| s.imported),
            finance = ?summary.finance.as_ref().map(|s| s.imported),
            "Restored backup"
        );
        Ok(summary)
    }

    fn safety_backup_if(&self, replaces_data: bool) -> FolioResult<Option<PathBuf>> {
        if !replaces_data {
            return Ok(None);
        }
        let Some(dir) = self.storage.backup_dir() else {
            return Ok(None);
        };
        let manager = BackupManager::new(dir.to_path_buf(), self.retention.clone());
        let (path, _) = manager.create_backup_with_retention(self.storage)?;
        Ok(Some(path))
    }
}

fn merge_into<T: Reidentify>(
    repo: &Repository<T>,
    incoming: Vec<T>,
    policy: MergePolicy,
) -> FolioResult<ImportSummary> {
    let mut merged = match policy {
        MergePolicy::Append => repo.snapshot()?.as_ref().clone(),
        MergePolicy::Replace => Vec::new(),
    };
    let mut seen: HashSet<String> = merged.iter().map(|r| r.id_str().to_string()).collect();

    let imported = incoming.len();
    let mut reassigned_ids = 0;
    for mut record in incoming {
        if seen.contains(record.id_str()) {
            let old = record.id_str().to_string();
            record.reassign_id();
            tracing::warn!(old_id = %old, new_id = %record.id_str(), "Imported {} id collides, assigning a new one", T::KIND);
            reassigned_ids += 1;
        }
        seen.insert(record.id_str().to_string());
        merged.push(record);
    }

    let total = merged.len();
    repo.replace(merged)?;

    Ok(ImportSummary {
        imported,
        reassigned_ids,
        total,
        policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{export_finance_csv, export_finance_json};
    use crate::storage::kv::MemoryStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(entry_type: EntryType, amount: f64, category: &str, description: &str) -> FinanceEntry {
        FinanceEntry::new(entry_type, amount, category, date(2024, 1, 15))
            .unwrap()
            .with_description(description)
    }

    #[test]
    fn test_csv_round_trip_with_commas_and_quotes() {
        let originals = vec![
            entry(EntryType::Income, 1000.0, "Salary", "January, \"net\" pay"),
            entry(EntryType::Expense, 12.34, "Food & Dining", ""),
            entry(EntryType::Expense, 0.1, "Travel", "line one\nline two"),
        ];

        let mut csv = Vec::new();
        export_finance_csv(&originals, &mut csv).unwrap();
        let parsed = parse_finance_csv(&String::from_utf8(csv).unwrap()).unwrap();

        assert_eq!(parsed.len(), originals.len());
        for (a, b) in originals.iter().zip(&parsed) {
            assert_eq!(a.date, b.date);
            assert_eq!(a.entry_type, b.entry_type);
            assert_eq!(a.category, b.category);
            assert_eq!(a.amount, b.amount);
            assert_eq!(a.description, b.description);
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn test_csv_without_description_column() {
        let text = "Date,Type,Category,Amount\n2024-01-20,expense,Food,400\n\n";
        let parsed = parse_finance_csv(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].description, "");
        assert_eq!(parsed[0].amount, 400.0);
    }

    #[test]
    fn test_csv_missing_header_is_rejected() {
        let err = parse_finance_csv("2024-01-20,expense,Food,400,Lunch\n").unwrap_err();
        assert!(err.is_import());
        assert!(err.to_string().contains("header"));

        assert!(parse_finance_csv("").unwrap_err().is_import());
    }

    #[test]
    fn test_csv_wrong_delimiter_is_rejected() {
        let text = "Date;Type;Category;Amount;Description\n2024-01-20;expense;Food;400;x\n";
        assert!(parse_finance_csv(text).unwrap_err().is_import());
    }

    #[test]
    fn test_csv_bad_row_reports_row_number() {
        let text = "Date,Type,Category,Amount,Description\n\
                    2024-01-20,expense,Food,400,ok\n\
                    2024-01-21,transfer,Food,5,bad\n";
        let err = parse_finance_csv(text).unwrap_err();
        assert!(err.is_import());
        assert!(err.to_string().contains("Row 3"), "{}", err);

        let text = "Date,Type,Category,Amount,Description\n2024-13-01,expense,Food,4,x\n";
        assert!(parse_finance_csv(text).unwrap_err().to_string().contains("invalid date"));

        let text = "Date,Type,Category,Amount,Description\n2024-01-01,expense,Food,abc,x\n";
        assert!(parse_finance_csv(text).unwrap_err().to_string().contains("invalid amount"));
    }

    #[test]
    fn test_csv_misaligned_columns_rejected() {
        let text = "Date,Type,Category,Amount,Description\n2024-01-01,expense,Food,4,x,extra\n";
        let err = parse_finance_csv(text).unwrap_err();
        assert!(err.to_string().contains("columns"));
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let originals = vec![
            entry(EntryType::Income, 1000.0, "Salary", "pay"),
            entry(EntryType::Expense, 99.99, "Food", "\"quoted\", with comma"),
        ];
        let mut json = Vec::new();
        export_finance_json(&originals, &mut json).unwrap();

        let parsed = parse_finance_json(std::str::from_utf8(&json).unwrap()).unwrap();
        assert_eq!(parsed, originals);
    }

    #[test]
    fn test_json_requires_array() {
        assert!(parse_finance_json(r#"{"entries": []}"#).unwrap_err().is_import());
        assert!(parse_finance_json("42").unwrap_err().is_import());
        assert!(parse_finance_json("not json").unwrap_err().is_import());
        assert!(parse_projects_json(r#"{"projects": []}"#).unwrap_err().is_import());
    }

    #[test]
    fn test_json_rejects_negative_amount() {
        let text = r#"[{"id":"1","type":"expense","amount":-3,"category":"Food","date":"2024-01-02",
            "createdAt":"2024-01-02T00:00:00Z","updatedAt":"2024-01-02T00:00:00Z"}]"#;
        assert!(parse_finance_json(text).unwrap_err().is_import());
    }

    #[test]
    fn test_projects_json_upgrades_legacy_records() {
        let text = r#"[{"id":"1700000000000","title":"Old","status":"completed","cost":900,
            "createdAt":"2023-01-01T00:00:00Z","updatedAt":"2023-01-02T00:00:00Z"}]"#;
        let projects = parse_projects_json(text).unwrap();
        assert_eq!(projects[0].total_cost(), 900.0);
    }

    #[test]
    fn test_backup_must_be_object() {
        assert!(parse_backup("[]").unwrap_err().is_import());
        assert!(parse_backup("{").unwrap_err().is_import());
    }

    #[test]
    fn test_backup_ignores_non_array_members() {
        let parsed = parse_backup(r#"{"projects": "nope", "financeEntries": []}"#).unwrap();
        assert!(parsed.projects.is_none());
        assert_eq!(parsed.finance_entries.map(|e| e.len()), Some(0));

        let parsed = parse_backup("{}").unwrap();
        assert!(parsed.projects.is_none());
        assert!(parsed.finance_entries.is_none());
    }

    #[test]
    fn test_finance_import_appends_and_reassigns_colliding_ids() {
        let storage = Storage::in_memory();
        let existing = entry(EntryType::Income, 10.0, "Gift", "");
        storage.finance.replace(vec![existing.clone()]).unwrap();

        let mut clash = entry(EntryType::Expense, 5.0, "Food", "");
        clash.id = existing.id.clone();
        let fresh = entry(EntryType::Expense, 7.0, "Food", "");

        let summary = ImportService::new(&storage)
            .import_finance(vec![clash, fresh])
            .unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.reassigned_ids, 1);
        assert_eq!(summary.total, 3);

        let all = storage.finance.snapshot().unwrap();
        let ids: HashSet<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(all[0], existing);
    }

    #[test]
    fn test_default_restore_replaces_projects_and_appends_finance() {
        let storage = Storage::in_memory();
        storage
            .projects
            .replace(vec![Project::new("Existing A"), Project::new("Existing B")])
            .unwrap();
        storage
            .finance
            .replace(vec![entry(EntryType::Income, 1000.0, "Salary", "")])
            .unwrap();

        let text = r#"{"projects": [], "financeEntries": [
            {"id":"imported-1","type":"expense","amount":40,"category":"Food","description":"",
             "date":"2024-01-20","createdAt":"2024-01-20T00:00:00Z","updatedAt":"2024-01-20T00:00:00Z"}
        ]}"#;
        let backup = parse_backup(text).unwrap();
        let summary = ImportService::new(&storage)
            .restore_backup(backup, RestoreOptions::default())
            .unwrap();

        assert!(storage.projects.snapshot().unwrap().is_empty());
        let finance = storage.finance.snapshot().unwrap();
        assert_eq!(finance.len(), 2);
        assert_eq!(finance[0].category, "Salary");
        assert_eq!(finance[1].id.as_str(), "imported-1");

        assert_eq!(summary.projects.unwrap().policy, MergePolicy::Replace);
        assert_eq!(summary.finance.unwrap().policy, MergePolicy::Append);
        assert!(summary.safety_backup.is_none());
    }

    #[test]
    fn test_restore_with_explicit_policies() {
        let storage = Storage::in_memory();
        storage.projects.replace(vec![Project::new("Existing")]).unwrap();
        storage
            .finance
            .replace(vec![entry(EntryType::Income, 1.0, "Gift", "")])
            .unwrap();

        let backup = BackupImport {
            projects: Some(vec![Project::new("Imported")]),
            finance_entries: Some(vec![entry(EntryType::Expense, 2.0, "Food", "")]),
        };
        let options = RestoreOptions {
            projects: MergePolicy::Append,
            finance: MergePolicy::Replace,
        };
        ImportService::new(&storage).restore_backup(backup, options).unwrap();

        assert_eq!(storage.projects.count().unwrap(), 2);
        let finance = storage.finance.snapshot().unwrap();
        assert_eq!(finance.len(), 1);
        assert_eq!(finance[0].category, "Food");
    }

    #[test]
    fn test_replace_all_restore_is_repeatable() {
        let storage = Storage::in_memory();
        storage
            .finance
            .replace(vec![entry(EntryType::Income, 1000.0, "Salary", "")])
            .unwrap();
        storage.projects.replace(vec![Project::new("Website")]).unwrap();

        let backup = BackupImport {
            projects: Some(storage.projects.snapshot().unwrap().as_ref().clone()),
            finance_entries: Some(storage.finance.snapshot().unwrap().as_ref().clone()),
        };
        let service = ImportService::new(&storage);
        service
            .restore_backup(backup.clone(), RestoreOptions::replace_all())
            .unwrap();
        let summary = service
            .restore_backup(backup, RestoreOptions::replace_all())
            .unwrap();

        assert_eq!(summary.finance.map(|s| s.reassigned_ids), Some(0));
        assert_eq!(storage.finance.count().unwrap(), 1);
        assert_eq!(storage.projects.count().unwrap(), 1);
    }

    #[test]
    fn test_finance_replace_takes_safety_backup() {
        let temp_dir = TempDir::new().unwrap();
        let backup_dir = temp_dir.path().join("backups");
        let storage =
            Storage::new(Arc::new(MemoryStore::new())).with_backup_dir(backup_dir.clone());
        storage
            .finance
            .replace(vec![entry(EntryType::Income, 1.0, "Gift", "")])
            .unwrap();

        let backup = BackupImport {
            projects: None,
            finance_entries: Some(vec![entry(EntryType::Expense, 2.0, "Food", "")]),
        };
        let summary = ImportService::new(&storage)
            .restore_backup(backup, RestoreOptions::replace_all())
            .unwrap();

        assert!(summary.safety_backup.is_some());
        assert_eq!(std::fs::read_dir(&backup_dir).unwrap().count(), 1);
    }

    #[test]
    fn test_replace_takes_safety_backup() {
        let temp_dir = TempDir::new().unwrap();
        let backup_dir = temp_dir.path().join("backups");
        let storage =
            Storage::new(Arc::new(MemoryStore::new())).with_backup_dir(backup_dir.clone());
        storage.projects.replace(vec![Project::new("Existing")]).unwrap();

        let summary = ImportService::new(&storage)
            .import_projects(vec![Project::new("Imported")], MergePolicy::Replace)
            .unwrap();
        assert_eq!(summary.total, 1);

        let backups: Vec<_> = std::fs::read_dir(&backup_dir).unwrap().collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_collection_untouched() {
        let store = Arc::new(MemoryStore::with_quota(2_000));
        let storage = Storage::new(store);
        storage
            .finance
            .replace(vec![entry(EntryType::Income, 1.0, "Gift", "")])
            .unwrap();

        let many: Vec<_> = (0..50)
            .map(|i| entry(EntryType::Expense, i as f64, "Food", "bulk"))
            .collect();
        let err = ImportService::new(&storage).import_finance(many).unwrap_err();
        assert!(matches!(err, FolioError::StorageFull(_)));
        assert_eq!(storage.finance.count().unwrap(), 1);
    }
}
