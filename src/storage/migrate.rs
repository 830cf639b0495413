//! Upgrade of project records written before entries existed
//!
//! Older project records kept `cost`, `startDate` and `endDate` on the
//! project itself, sometimes carried a `paymentStatus`, used a few status
//! spellings the current enum does not know, and may lack `clientName` or
//! `entries` altogether. They are converted into the canonical shape here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::models::{
    EntryStatus, Project, ProjectEntry, ProjectEntryId, ProjectFile, ProjectId, ProjectLink,
    ProjectStatus,
};

/// Title given to the entry synthesized from a legacy project-level cost
pub const LEGACY_COST_ENTRY_TITLE: &str = "Project cost";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyProject {
    id: ProjectId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    client_name: Option<String>,
    #[serde(default)]
    project_type: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    files: Vec<ProjectFile>,
    #[serde(default)]
    links: Vec<ProjectLink>,
    #[serde(default)]
    entries: Option<Vec<Value>>,
    #[serde(default)]
    cost: Option<f64>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Convert any known historical project shape into a [`Project`]
pub fn upgrade_legacy_project(value: Value) -> Result<Project, serde_json::Error> {
    let mut legacy: LegacyProject = serde_json::from_value(value)?;

    let status = legacy
        .status
        .as_deref()
        .map(legacy_status)
        .unwrap_or_default();
    let created_at = legacy.created_at;
    let updated_at = legacy.updated_at.unwrap_or(created_at).max(created_at);

    let entries = match legacy.entries.take() {
        Some(raw) => raw
            .into_iter()
            .map(|entry| upgrade_entry(entry, created_at))
            .collect::<Result<Vec<_>, _>>()?,
        None => synthesize_cost_entry(&legacy, status, created_at, updated_at)
            .into_iter()
            .collect(),
    };

    Ok(Project {
        id: legacy.id,
        title: legacy.title,
        description: legacy.description,
        client_name: legacy.client_name.unwrap_or_default(),
        project_type: legacy.project_type.unwrap_or_default(),
        status,
        notes: legacy.notes.unwrap_or_default(),
        tags: legacy
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<BTreeSet<_>>(),
        files: legacy.files,
        links: legacy.links,
        entries,
        created_at,
        updated_at,
    })
}

/// Map a historical status spelling onto the current enum
fn legacy_status(raw: &str) -> ProjectStatus {
    if let Ok(status) = raw.parse::<ProjectStatus>() {
        return status;
    }
    match raw.trim().to_lowercase().as_str() {
        "active" | "ongoing" | "started" => ProjectStatus::InProgress,
        "done" | "finished" | "complete" => ProjectStatus::Completed,
        "paused" | "hold" | "blocked" => ProjectStatus::OnHold,
        "canceled" | "abandoned" => ProjectStatus::Cancelled,
        other => {
            tracing::warn!(status = other, "Unknown legacy project status, using planning");
            ProjectStatus::Planning
        }
    }
}

/// Fill in the fields older entry records may be missing
fn upgrade_entry(
    value: Value,
    project_created: DateTime<Utc>,
) -> Result<ProjectEntry, serde_json::Error> {
    let mut map = match value {
        Value::Object(map) => map,
        other => return serde_json::from_value(other),
    };

    let stamp = Value::String(project_created.to_rfc3339());
    map.entry("id")
        .or_insert_with(|| Value::String(ProjectEntryId::new().to_string()));
    map.entry("createdAt").or_insert_with(|| stamp.clone());
    map.entry("updatedAt").or_insert(stamp);
    normalize_date_field(&mut map, "startDate");
    normalize_date_field(&mut map, "endDate");
    map.entry("startDate")
        .or_insert_with(|| Value::String(project_created.date_naive().to_string()));

    serde_json::from_value(Value::Object(map))
}

/// Reduce full timestamps to their calendar date; drop blank or unreadable values
fn normalize_date_field(map: &mut Map<String, Value>, field: &str) {
    let parsed = match map.get(field) {
        Some(Value::String(s)) => parse_legacy_date(s),
        Some(_) | None => None,
    };
    match parsed {
        Some(date) => {
            map.insert(field.to_string(), Value::String(date.to_string()));
        }
        None => {
            map.remove(field);
        }
    }
}

fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Move a project-level cost/date range into a single entry
fn synthesize_cost_entry(
    legacy: &LegacyProject,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Option<ProjectEntry> {
    let cost = legacy.cost.filter(|c| c.is_finite() && *c > 0.0);
    let start = legacy.start_date.as_deref().and_then(parse_legacy_date);
    let end = legacy.end_date.as_deref().and_then(parse_legacy_date);

    if cost.is_none() && start.is_none() && end.is_none() {
        return None;
    }

    let start_date = start.unwrap_or_else(|| created_at.date_naive());
    let (entry_status, progress) = match status {
        ProjectStatus::Completed => (EntryStatus::Completed, 100),
        ProjectStatus::InProgress => (EntryStatus::InProgress, 0),
        ProjectStatus::Cancelled => (EntryStatus::Cancelled, 0),
        ProjectStatus::Planning | ProjectStatus::OnHold => (EntryStatus::NotStarted, 0),
    };

    Some(ProjectEntry {
        id: ProjectEntryId::new(),
        title: LEGACY_COST_ENTRY_TITLE.to_string(),
        description: String::new(),
        start_date,
        end_date: end.filter(|e| *e >= start_date),
        progress,
        cost: cost.unwrap_or(0.0),
        status: entry_status,
        category: String::new(),
        notes: String::new(),
        created_at,
        updated_at,
    })
}
