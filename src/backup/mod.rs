//! Backup system for Folio
//!
//! Writes timestamped copies of both collections into the backups directory
//! and prunes them according to the configured retention policy.
//!
//! Each backup file is a combined backup document (see
//! [`crate::export::Backup`]), so any of them can be restored with the
//! regular backup import.
//!
//! # Retention Policy
//!
//! By default, the system keeps:
//! - 30 daily backups
//! - 12 monthly backups (backups taken on the first day of a month)

mod manager;

pub use manager::{BackupInfo, BackupManager};
