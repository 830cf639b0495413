//! CLI commands for data import
//!
//! Files are parsed and validated in full before anything is written, so a
//! bad row leaves the stored data untouched.

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::config::settings::Settings;
use crate::error::{FolioError, FolioResult};
use crate::services::{
    parse_backup, parse_finance_csv, parse_finance_json, parse_projects_json, ImportService,
    ImportSummary, MergePolicy, RestoreOptions,
};
use crate::storage::Storage;

/// Import subcommands
#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Append finance entries from a JSON export
    FinanceJson {
        /// Path to JSON file
        file: PathBuf,
    },
    /// Append finance entries from a CSV export
    FinanceCsv {
        /// Path to CSV file
        file: PathBuf,
    },
    /// Load projects from a JSON export
    Projects {
        /// Path to JSON file
        file: PathBuf,
        /// How to combine with existing projects (replace, append)
        #[arg(long, default_value = "replace")]
        policy: String,
    },
    /// Restore a combined backup
    Backup {
        /// Path to backup file
        file: PathBuf,
        /// Policy for projects (replace, append)
        #[arg(long, default_value = "replace")]
        projects: String,
        /// Policy for finance entries (replace, append)
        #[arg(long, default_value = "append")]
        finance: String,
    },
}

/// Handle import commands
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ImportCommands,
) -> FolioResult<()> {
    let service = ImportService::new(storage).with_retention(settings.backup_retention.clone());

    match cmd {
        ImportCommands::FinanceJson { file } => {
            let entries = parse_finance_json(&read_file(&file)?)?;
            print_summary("finance entries", &service.import_finance(entries)?);
        }
        ImportCommands::FinanceCsv { file } => {
            let entries = parse_finance_csv(&read_file(&file)?)?;
            print_summary("finance entries", &service.import_finance(entries)?);
        }
        ImportCommands::Projects { file, policy } => {
            let policy: MergePolicy = policy.parse()?;
            let projects = parse_projects_json(&read_file(&file)?)?;
            print_summary("projects", &service.import_projects(projects, policy)?);
        }
        ImportCommands::Backup {
            file,
            projects,
            finance,
        } => {
            let options = RestoreOptions {
                projects: projects.parse()?,
                finance: finance.parse()?,
            };
            let backup = parse_backup(&read_file(&file)?)?;
            let summary = service.restore_backup(backup, options)?;

            if let Some(path) = &summary.safety_backup {
                println!("Safety backup: {}", path.display());
            }
            match &summary.projects {
                Some(s) => print_summary("projects", s),
                None => println!("No projects in backup; projects unchanged."),
            }
            match &summary.finance {
                Some(s) => print_summary("finance entries", s),
                None => println!("No finance entries in backup; finance unchanged."),
            }
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> FolioResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| FolioError::Import(format!("Failed to read {}: {}", path.display(), e)))
}

fn print_summary(what: &str, summary: &ImportSummary) {
    println!(
        "Imported {} {} ({}); {} total",
        summary.imported, what, summary.policy, summary.total
    );
    if summary.reassigned_ids > 0 {
        println!("  {} duplicate IDs were reassigned", summary.reassigned_ids);
    }
}
