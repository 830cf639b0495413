//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod export;
pub mod finance;
pub mod import;
pub mod project;

pub use backup::{handle_backup_command, BackupCommands};
pub use export::{handle_export_command, ExportCommands};
pub use finance::{handle_finance_command, FinanceCommands};
pub use import::{handle_import_command, ImportCommands};
pub use project::{handle_project_command, ProjectCommands};

use chrono::NaiveDate;

use crate::error::{FolioError, FolioResult};

/// Parse a `YYYY-MM-DD` argument
pub(crate) fn parse_date(value: &str) -> FolioResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        FolioError::Validation(format!(
            "Invalid date '{}'. Use format YYYY-MM-DD",
            value
        ))
    })
}

/// Parse an optional date argument, defaulting to today
pub(crate) fn date_or_today(value: Option<&str>) -> FolioResult<NaiveDate> {
    match value {
        Some(value) => parse_date(value),
        None => Ok(crate::reports::today()),
    }
}
