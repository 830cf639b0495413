//! Core data models for Folio
//!
//! This module contains the records the tracker persists: finance entries and
//! projects together with their nested entries, files and links.

pub mod finance;
pub mod ids;
pub mod project;

pub use finance::{EntryType, FinanceEntry, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use ids::{EntryId, FileId, LinkId, ProjectEntryId, ProjectId};
pub use project::{
    check_attachment_size, clamp_progress, EntryStatus, Project, ProjectEntry, ProjectFile,
    ProjectLink, ProjectStatus, MAX_ATTACHMENT_BYTES, UNSPECIFIED_TYPE,
};

use chrono::{DateTime, Utc};

/// Refresh a modification timestamp without ever moving it backwards
pub(crate) fn touch(updated_at: &mut DateTime<Utc>) {
    let now = Utc::now();
    if now > *updated_at {
        *updated_at = now;
    }
}
