//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::backup::BackupManager;
use crate::config::settings::Settings;
use crate::display::format_bytes;
use crate::error::{FolioError, FolioResult};
use crate::services::{parse_backup, ImportService, RestoreOptions};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create,

    /// List all available backups
    List,

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete old backups according to retention policy
    Prune,
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    backup_dir: &Path,
    settings: &Settings,
    cmd: BackupCommands,
) -> FolioResult<()> {
    let manager = BackupManager::new(backup_dir.to_path_buf(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, pruned) = manager.create_backup_with_retention(storage)?;
            let filename = backup_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| backup_path.display().to_string());
            println!("Backup created: {}", filename);
            println!("Location: {}", backup_path.display());
            if !pruned.is_empty() {
                println!("Pruned {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: folio backup create");
                return Ok(());
            }

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);
                let monthly_marker = if backup.is_monthly { " [monthly]" } else { "" };
                println!(
                    "  {}. {} ({} ago, {}){}",
                    i + 1,
                    backup.filename,
                    format_duration(age),
                    format_bytes(backup.size_bytes),
                    monthly_marker,
                );
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let text = std::fs::read_to_string(&backup_path).map_err(|e| {
                FolioError::Import(format!("Failed to read {}: {}", backup_path.display(), e))
            })?;
            let parsed = parse_backup(&text)?;

            println!("File: {}", backup_path.display());
            println!(
                "Contents: {} projects, {} finance entries",
                parsed.projects.as_ref().map_or(0, Vec::len),
                parsed.finance_entries.as_ref().map_or(0, Vec::len)
            );

            if !force {
                println!();
                println!("WARNING: This will replace all current projects and finance entries!");
                println!("To proceed, run again with --force flag:");
                println!("  folio backup restore {} --force", backup);
                return Ok(());
            }

            let service =
                ImportService::new(storage).with_retention(settings.backup_retention.clone());
            let summary = service.restore_backup(parsed, RestoreOptions::replace_all())?;
            if let Some(path) = &summary.safety_backup {
                println!("Pre-restore backup saved: {}", path.display());
            }
            println!("Restore complete!");
        }

        BackupCommands::Prune => {
            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> FolioResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| FolioError::NotFound {
                entity_type: "Backup",
                identifier: "latest".to_string(),
            });
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    for candidate in [
        manager.backup_dir().join(backup),
        manager.backup_dir().join(format!("{}.json", backup)),
    ] {
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(FolioError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }
    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }
    format!("{}mo", days / 30)
}
