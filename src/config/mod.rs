//! Configuration module for Folio
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FolioPaths;
pub use settings::{BackupRetention, LinkPreviewMode, LinkPreviewSettings, Settings};
