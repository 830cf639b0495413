//! Project model
//!
//! A project owns its progress entries, attached files and bookmarked links.
//! None of the nested records has an identity outside its parent project, so
//! removing a project removes all of them with it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::ids::{FileId, LinkId, ProjectEntryId, ProjectId};
use super::touch;
use crate::error::{FolioError, FolioResult};

/// Largest accepted attachment, in bytes (10 MiB)
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        Self::Planning,
        Self::InProgress,
        Self::Completed,
        Self::OnHold,
        Self::Cancelled,
    ];

    /// Wire name, e.g. `on-hold`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label, e.g. `On Hold`
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectStatus {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| FolioError::Validation(format!("Unknown project status: {}", s)))
    }
}

/// Status of a single project entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EntryStatus {
    #[default]
    #[serde(alias = "planned")]
    NotStarted,
    InProgress,
    Completed,
    Cancelled,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "not-started" | "planned" => Ok(Self::NotStarted),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(FolioError::Validation(format!("Unknown entry status: {}", s))),
        }
    }
}

/// Clamp a progress value into [0, 100]
pub fn clamp_progress(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_progress(raw))
}

fn deserialize_cost<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(if raw.is_finite() { raw.max(0.0) } else { 0.0 })
}

/// One unit of progress/billing within a project timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub id: ProjectEntryId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub start_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Completion percentage, always within [0, 100]
    #[serde(default, deserialize_with = "deserialize_progress")]
    pub progress: u8,

    #[serde(default, deserialize_with = "deserialize_cost")]
    pub cost: f64,

    #[serde(default)]
    pub status: EntryStatus,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl ProjectEntry {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectEntryId::new(),
            title: title.into(),
            description: String::new(),
            start_date,
            end_date: None,
            progress: 0,
            cost: 0.0,
            status: EntryStatus::NotStarted,
            category: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set progress from any number, clamping into range
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = clamp_progress(progress);
    }

    pub fn validate(&self) -> FolioResult<()> {
        if self.title.trim().is_empty() {
            return Err(FolioError::Validation("Entry title cannot be empty".into()));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(FolioError::Validation(format!(
                "Entry cost must be a non-negative number, got {}",
                self.cost
            )));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(FolioError::Validation(format!(
                    "Entry end date {} is before its start date {}",
                    end, self.start_date
                )));
            }
        }
        Ok(())
    }

    pub fn touch(&mut self) {
        touch(&mut self.updated_at);
    }
}

/// A file attached to a project, stored inline as a `data:` URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub id: FileId,

    pub name: String,

    /// Size of the decoded payload in bytes
    pub size: u64,

    /// MIME type
    #[serde(rename = "type", default)]
    pub mime_type: String,

    /// `data:<mime>;base64,<payload>`
    pub data: String,

    pub uploaded_at: DateTime<Utc>,
}

impl ProjectFile {
    /// Encode raw bytes as an attachment, rejecting anything over the size cap
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
    ) -> FolioResult<Self> {
        let name = name.into();
        let size = bytes.len() as u64;
        check_attachment_size(&name, size)?;

        let mut mime_type = mime_type.into();
        if mime_type.trim().is_empty() {
            mime_type = "application/octet-stream".to_string();
        }

        Ok(Self {
            id: FileId::new(),
            data: format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)),
            name,
            size,
            mime_type,
            uploaded_at: Utc::now(),
        })
    }

    /// Decode the inline payload back into bytes
    pub fn decode(&self) -> FolioResult<Vec<u8>> {
        let payload = match self.data.split_once(',') {
            Some((header, body)) if header.starts_with("data:") => body,
            _ => self.data.as_str(),
        };
        STANDARD
            .decode(payload.trim())
            .map_err(|e| FolioError::Validation(format!("Corrupt payload in {}: {}", self.name, e)))
    }
}

/// Reject attachments larger than [`MAX_ATTACHMENT_BYTES`]
pub fn check_attachment_size(name: &str, size: u64) -> FolioResult<()> {
    if size > MAX_ATTACHMENT_BYTES {
        return Err(FolioError::AttachmentTooLarge {
            name: name.to_string(),
            size,
            limit: MAX_ATTACHMENT_BYTES,
        });
    }
    Ok(())
}

/// A bookmarked link with advisory preview metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLink {
    pub id: LinkId,

    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub added_at: DateTime<Utc>,
}

/// A tracked project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub client_name: String,

    #[serde(default)]
    pub project_type: String,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub files: Vec<ProjectFile>,

    #[serde(default)]
    pub links: Vec<ProjectLink>,

    #[serde(default)]
    pub entries: Vec<ProjectEntry>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            title: title.into(),
            description: String::new(),
            client_name: String::new(),
            project_type: String::new(),
            status: ProjectStatus::Planning,
            notes: String::new(),
            tags: BTreeSet::new(),
            files: Vec::new(),
            links: Vec::new(),
            entries: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of every entry's cost
    pub fn total_cost(&self) -> f64 {
        self.entries.iter().map(|e| e.cost).sum()
    }

    /// Mean entry progress, 0 when the project has no entries
    pub fn average_progress(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.entries.iter().map(|e| f64::from(e.progress)).sum();
        sum / self.entries.len() as f64
    }

    /// Project type, or the `Unspecified` bucket when blank
    pub fn type_label(&self) -> &str {
        let trimmed = self.project_type.trim();
        if trimmed.is_empty() {
            UNSPECIFIED_TYPE
        } else {
            trimmed
        }
    }

    pub fn validate(&self) -> FolioResult<()> {
        if self.title.trim().is_empty() {
            return Err(FolioError::Validation("Project title cannot be empty".into()));
        }
        for entry in &self.entries {
            entry.validate()?;
        }
        Ok(())
    }

    pub fn touch(&mut self) {
        touch(&mut self.updated_at);
    }
}

/// Label for projects without a type
pub const UNSPECIFIED_TYPE: &str = "Unspecified";
