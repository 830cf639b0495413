//! CLI commands for data export
//!
//! Each export writes to the given path, or to its dated default filename
//! in the current directory.

use clap::Subcommand;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::{FolioError, FolioResult};
use crate::export::{
    export_backup, export_filename, export_finance_csv, export_finance_json, export_projects_json,
    ExportKind,
};
use crate::reports::today;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export finance entries as JSON
    FinanceJson {
        /// Output file path
        output: Option<PathBuf>,
    },
    /// Export finance entries as CSV
    FinanceCsv {
        /// Output file path
        output: Option<PathBuf>,
    },
    /// Export projects as JSON
    Projects {
        /// Output file path
        output: Option<PathBuf>,
    },
    /// Export projects and finance entries together
    Backup {
        /// Output file path
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> FolioResult<()> {
    match cmd {
        ExportCommands::FinanceJson { output } => {
            let entries = storage.finance.snapshot()?;
            let path = write_export(ExportKind::FinanceJson, output, |w| {
                export_finance_json(&entries, w)
            })?;
            println!("Exported {} entries to {}", entries.len(), path.display());
        }
        ExportCommands::FinanceCsv { output } => {
            let entries = storage.finance.snapshot()?;
            let path = write_export(ExportKind::FinanceCsv, output, |w| {
                export_finance_csv(&entries, w)
            })?;
            println!("Exported {} entries to {}", entries.len(), path.display());
        }
        ExportCommands::Projects { output } => {
            let projects = storage.projects.snapshot()?;
            let path = write_export(ExportKind::Projects, output, |w| {
                export_projects_json(&projects, w)
            })?;
            println!("Exported {} projects to {}", projects.len(), path.display());
        }
        ExportCommands::Backup { output } => {
            let mut counts = (0, 0);
            let path = write_export(ExportKind::Backup, output, |w| {
                let backup = export_backup(storage, w)?;
                counts = (backup.projects.len(), backup.finance_entries.len());
                Ok(())
            })?;
            println!(
                "Exported {} projects and {} entries to {}",
                counts.0,
                counts.1,
                path.display()
            );
        }
    }
    Ok(())
}

fn write_export<F>(kind: ExportKind, output: Option<PathBuf>, write: F) -> FolioResult<PathBuf>
where
    F: FnOnce(&mut BufWriter<File>) -> FolioResult<()>,
{
    let path = output.unwrap_or_else(|| PathBuf::from(export_filename(kind, today())));
    let file = File::create(&path).map_err(|e| {
        FolioError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer
        .flush()
        .map_err(|e| FolioError::Export(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(path)
}
