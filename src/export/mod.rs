//! Export module for Folio
//!
//! Writes collections to portable text formats:
//! - CSV: finance entries, spreadsheet-compatible
//! - JSON: finance entries or projects as a pretty-printed array
//! - Backup: both collections plus metadata in one JSON document

pub mod backup;
pub mod csv;
pub mod json;

pub use backup::{export_backup, Backup, BACKUP_FORMAT_VERSION};
pub use csv::{export_finance_csv, FINANCE_CSV_HEADER};
pub use json::{export_finance_json, export_projects_json};

use chrono::NaiveDate;

/// Kinds of exported file, each with its own dated filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    FinanceJson,
    FinanceCsv,
    Projects,
    Backup,
}

impl ExportKind {
    fn stem(&self) -> &'static str {
        match self {
            Self::FinanceJson | Self::FinanceCsv => "finance-data",
            Self::Projects => "projects-backup",
            Self::Backup => "complete-backup",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            Self::FinanceCsv => "csv",
            Self::FinanceJson | Self::Projects | Self::Backup => "json",
        }
    }
}

/// Default filename for an export made on `date`, e.g. `finance-data-2024-01-15.csv`
pub fn export_filename(kind: ExportKind, date: NaiveDate) -> String {
    format!("{}-{}.{}", kind.stem(), date.format("%Y-%m-%d"), kind.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filenames() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(export_filename(ExportKind::FinanceJson, date), "finance-data-2024-01-05.json");
        assert_eq!(export_filename(ExportKind::FinanceCsv, date), "finance-data-2024-01-05.csv");
        assert_eq!(export_filename(ExportKind::Projects, date), "projects-backup-2024-01-05.json");
        assert_eq!(export_filename(ExportKind::Backup, date), "complete-backup-2024-01-05.json");
    }
}
