//! JSON export of single collections

use serde::Serialize;
use std::io::Write;

use crate::error::{FolioError, FolioResult};
use crate::models::{FinanceEntry, Project};

/// Export finance entries as a pretty-printed JSON array
pub fn export_finance_json<W: Write>(entries: &[FinanceEntry], writer: &mut W) -> FolioResult<()> {
    write_pretty(entries, writer)
}

/// Export projects as a pretty-printed JSON array
pub fn export_projects_json<W: Write>(projects: &[Project], writer: &mut W) -> FolioResult<()> {
    write_pretty(projects, writer)
}

pub(crate) fn write_pretty<T: Serialize + ?Sized, W: Write>(value: &T, writer: &mut W) -> FolioResult<()> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(|e| FolioError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FolioError::Export(e.to_string()))?;
    Ok(())
}
