//! User settings for Folio
//!
//! Manages user preferences including display formatting, backup retention
//! and how link previews are resolved.

use serde::{Deserialize, Serialize};

use super::paths::FolioPaths;
use crate::error::FolioError;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// How link metadata is looked up when a link is added to a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkPreviewMode {
    /// Hostname heuristics only, no network access
    #[default]
    Offline,
    /// Fetch the page and read its metadata tags
    Network,
}

/// Link preview settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPreviewSettings {
    #[serde(default)]
    pub mode: LinkPreviewMode,

    /// Total time budget for one networked lookup, body included
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for LinkPreviewSettings {
    fn default() -> Self {
        Self {
            mode: LinkPreviewMode::default(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// User settings for Folio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    #[serde(default)]
    pub link_preview: LinkPreviewSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "Rs.".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    concat!("folio-tracker/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            backup_retention: BackupRetention::default(),
            link_preview: LinkPreviewSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FolioPaths) -> Result<Self, FolioError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| FolioError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FolioError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FolioPaths) -> Result<(), FolioError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FolioError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FolioError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
