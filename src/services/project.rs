//! Project service
//!
//! Provides business logic for projects and everything they own: progress
//! entries, attached files and bookmarked links. Any change to a nested
//! record refreshes the parent project's `updated_at`.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FolioError, FolioResult};
use crate::links::{fetch_preview, LinkResolver};
use crate::models::{
    check_attachment_size, EntryStatus, FileId, LinkId, Project, ProjectEntry, ProjectEntryId, ProjectFile, ProjectId,
    ProjectLink, ProjectStatus,
};
use crate::storage::Storage;

use super::{find_by_prefix, position_by_prefix, SortOrder};

/// Suffix appended to the title of a duplicated project
pub const COPY_SUFFIX: &str = " (Copy)";

/// Service for project management
pub struct ProjectService<'a> {
    storage: &'a Storage,
}

/// Options for filtering projects
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive match against title or description
    pub search: Option<String>,
    /// Keep projects carrying any of these tags; empty keeps all
    pub tags: Vec<String>,
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    fn matches(&self, project: &Project) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                project.title.to_lowercase().contains(&term)
                    || project.description.to_lowercase().contains(&term)
            }
            _ => true,
        };
        let matches_tags =
            self.tags.is_empty() || self.tags.iter().any(|t| project.tags.contains(t.trim()));
        matches_search && matches_tags
    }
}

/// Input for creating a new project
#[derive(Debug, Clone, Default)]
pub struct CreateProjectInput {
    pub title: String,
    pub description: String,
    pub client_name: String,
    pub project_type: String,
    pub status: ProjectStatus,
    pub notes: String,
    pub tags: Vec<String>,
}

/// Field changes for an existing project; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub project_type: Option<String>,
    pub status: Option<ProjectStatus>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Full set of editable fields of a project entry
#[derive(Debug, Clone)]
pub struct EntryInput {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Clamped into [0, 100]
    pub progress: f64,
    pub cost: f64,
    pub status: EntryStatus,
    pub category: String,
    pub notes: String,
}

impl EntryInput {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start_date,
            end_date: None,
            progress: 0.0,
            cost: 0.0,
            status: EntryStatus::NotStarted,
            category: String::new(),
            notes: String::new(),
        }
    }

    fn apply_to(self, entry: &mut ProjectEntry) {
        entry.title = self.title.trim().to_string();
        entry.description = self.description;
        entry.start_date = self.start_date;
        entry.end_date = self.end_date;
        entry.set_progress(self.progress);
        entry.cost = self.cost;
        entry.status = self.status;
        entry.category = self.category;
        entry.notes = self.notes;
    }
}

/// Field a project entry listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntrySortKey {
    #[default]
    StartDate,
    Progress,
    Cost,
}

impl FromStr for EntrySortKey {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "startdate" | "date" => Ok(Self::StartDate),
            "progress" => Ok(Self::Progress),
            "cost" => Ok(Self::Cost),
            other => Err(FolioError::Validation(format!(
                "Unknown sort key '{}': expected start-date, progress or cost",
                other
            ))),
        }
    }
}

/// A file offered for attachment
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension
    ///
    /// The size cap is checked against the file metadata before any bytes
    /// are read.
    pub fn read(path: &Path) -> FolioResult<Self> {
        let name = display_name(path);
        let metadata = std::fs::metadata(path).map_err(|e| {
            FolioError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        check_attachment_size(&name, metadata.len())?;

        let bytes = std::fs::read(path).map_err(|e| {
            FolioError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mime_type = guess_mime_type(path).to_string();
        Ok(Self::new(name, mime_type, bytes))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// A file refused during a batch attach
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFile {
    pub name: String,
    pub reason: String,
}

/// Result of a batch attach
#[derive(Debug, Clone, Default)]
pub struct AttachOutcome {
    pub attached: Vec<ProjectFile>,
    pub rejected: Vec<RejectedFile>,
}

impl<'a> ProjectService<'a> {
    /// Create a new project service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new project
    pub fn create(&self, input: CreateProjectInput) -> FolioResult<Project> {
        let mut project = Project::new(input.title.trim());
        project.description = input.description;
        project.client_name = input.client_name.trim().to_string();
        project.project_type = input.project_type.trim().to_string();
        project.status = input.status;
        project.notes = input.notes;
        project.tags = normalize_tags(input.tags);
        project.validate()?;

        let mut projects = self.all()?;
        projects.push(project.clone());
        self.storage.projects.replace(projects)?;

        tracing::debug!(id = %project.id, "Created project");
        Ok(project)
    }

    pub fn get(&self, id: &ProjectId) -> FolioResult<Option<Project>> {
        let projects = self.storage.projects.snapshot()?;
        Ok(projects.iter().find(|p| &p.id == id).cloned())
    }

    /// Find a project by full id or unique id prefix
    pub fn find(&self, identifier: &str) -> FolioResult<Option<Project>> {
        let projects = self.storage.projects.snapshot()?;
        Ok(find_by_prefix(&projects, identifier, |p| p.id.as_str())?.cloned())
    }

    /// Like [`find`](Self::find) but a miss is an error
    pub fn resolve(&self, identifier: &str) -> FolioResult<Project> {
        self.find(identifier)?
            .ok_or_else(|| FolioError::project_not_found(identifier))
    }

    /// Every project in stored order
    pub fn all(&self) -> FolioResult<Vec<Project>> {
        Ok(self.storage.projects.snapshot()?.as_ref().clone())
    }

    /// Projects matching a search term and tag selection
    pub fn list(&self, filter: &ProjectFilter) -> FolioResult<Vec<Project>> {
        let projects = self.storage.projects.snapshot()?;
        Ok(projects
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    /// Distinct tags across all projects, sorted
    pub fn all_tags(&self) -> FolioResult<Vec<String>> {
        let projects = self.storage.projects.snapshot()?;
        let tags: BTreeSet<&String> = projects.iter().flat_map(|p| p.tags.iter()).collect();
        Ok(tags.into_iter().cloned().collect())
    }

    /// Update a project's own fields
    pub fn update(&self, id: &ProjectId, input: UpdateProjectInput) -> FolioResult<Project> {
        self.modify(id, |project| {
            if let Some(title) = input.title {
                project.title = title.trim().to_string();
            }
            if let Some(description) = input.description {
                project.description = description;
            }
            if let Some(client_name) = input.client_name {
                project.client_name = client_name.trim().to_string();
            }
            if let Some(project_type) = input.project_type {
                project.project_type = project_type.trim().to_string();
            }
            if let Some(status) = input.status {
                project.status = status;
            }
            if let Some(notes) = input.notes {
                project.notes = notes;
            }
            if let Some(tags) = input.tags {
                project.tags = normalize_tags(tags);
            }
            project.validate()?;
            Ok(project.clone())
        })
    }

    /// Remove a project together with its entries, files and links
    pub fn delete(&self, id: &ProjectId) -> FolioResult<Project> {
        let mut projects = self.all()?;
        let position = projects
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| FolioError::project_not_found(id.as_str()))?;
        let removed = projects.remove(position);
        self.storage.projects.replace(projects)?;

        tracing::debug!(
            id = %removed.id,
            entries = removed.entries.len(),
            files = removed.files.len(),
            links = removed.links.len(),
            "Deleted project"
        );
        Ok(removed)
    }

    /// Copy a project under a new id with fresh timestamps
    pub fn duplicate(&self, id: &ProjectId) -> FolioResult<Project> {
        let source = self
            .get(id)?
            .ok_or_else(|| FolioError::project_not_found(id.as_str()))?;

        let fresh = Project::new(format!("{}{}", source.title, COPY_SUFFIX));
        let copy = Project {
            id: fresh.id,
            title: fresh.title,
            created_at: fresh.created_at,
            updated_at: fresh.updated_at,
            ..source
        };

        let mut projects = self.all()?;
        projects.push(copy.clone());
        self.storage.projects.replace(projects)?;
        Ok(copy)
    }

    /// Entries of a project in the requested order
    pub fn sorted_entries(
        &self,
        id: &ProjectId,
        sort_by: EntrySortKey,
        order: SortOrder,
    ) -> FolioResult<Vec<ProjectEntry>> {
        let project = self
            .get(id)?
            .ok_or_else(|| FolioError::project_not_found(id.as_str()))?;
        let mut entries = project.entries;
        entries.sort_by(|a, b| {
            let ordering = match sort_by {
                EntrySortKey::StartDate => a.start_date.cmp(&b.start_date),
                EntrySortKey::Progress => a.progress.cmp(&b.progress),
                EntrySortKey::Cost => a.cost.total_cmp(&b.cost),
            };
            order.apply(ordering)
        });
        Ok(entries)
    }

    /// Add a progress entry to a project
    pub fn add_entry(&self, id: &ProjectId, input: EntryInput) -> FolioResult<ProjectEntry> {
        self.modify(id, |project| {
            let mut entry = ProjectEntry::new(String::new(), input.start_date);
            input.apply_to(&mut entry);
            entry.validate()?;
            project.entries.push(entry.clone());
            Ok(entry)
        })
    }

    /// Replace the editable fields of an entry
    pub fn update_entry(
        &self,
        id: &ProjectId,
        entry_id: &ProjectEntryId,
        input: EntryInput,
    ) -> FolioResult<ProjectEntry> {
        self.modify(id, |project| {
            let entry = project
                .entries
                .iter_mut()
                .find(|e| &e.id == entry_id)
                .ok_or_else(|| FolioError::project_entry_not_found(entry_id.as_str()))?;
            input.apply_to(entry);
            entry.validate()?;
            entry.touch();
            Ok(entry.clone())
        })
    }

    pub fn delete_entry(
        &self,
        id: &ProjectId,
        entry_id: &ProjectEntryId,
    ) -> FolioResult<ProjectEntry> {
        self.modify(id, |project| {
            let position = project
                .entries
                .iter()
                .position(|e| &e.id == entry_id)
                .ok_or_else(|| FolioError::project_entry_not_found(entry_id.as_str()))?;
            Ok(project.entries.remove(position))
        })
    }

    /// Attach a batch of files
    ///
    /// Oversized files are rejected one by one; the rest of the batch is
    /// still attached. A batch in which every file is rejected does not
    /// touch the project.
    pub fn attach_files(&self, id: &ProjectId, files: Vec<IncomingFile>) -> FolioResult<AttachOutcome> {
        let mut outcome = AttachOutcome::default();
        for file in files {
            match ProjectFile::from_bytes(file.name.clone(), file.mime_type, &file.bytes) {
                Ok(encoded) => outcome.attached.push(encoded),
                Err(e) => {
                    tracing::warn!(file = %file.name, error = %e, "Rejected attachment");
                    outcome.rejected.push(RejectedFile {
                        name: file.name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if outcome.attached.is_empty() {
            if self.get(id)?.is_none() {
                return Err(FolioError::project_not_found(id.as_str()));
            }
            return Ok(outcome);
        }

        let attached = outcome.attached.clone();
        self.modify(id, move |project| {
            project.files.extend(attached);
            Ok(())
        })?;
        Ok(outcome)
    }

    /// Read and attach files from disk
    ///
    /// A path that cannot be read or is over the size cap is rejected on its
    /// own; the rest of the batch still goes through.
    pub fn attach_paths<P: AsRef<Path>>(
        &self,
        id: &ProjectId,
        paths: &[P],
    ) -> FolioResult<AttachOutcome> {
        let mut incoming = Vec::new();
        let mut unreadable = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match IncomingFile::read(path) {
                Ok(file) => incoming.push(file),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Rejected attachment");
                    unreadable.push(RejectedFile {
                        name: display_name(path),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let mut outcome = self.attach_files(id, incoming)?;
        outcome.rejected.extend(unreadable);
        Ok(outcome)
    }

    /// Remove an attached file
    pub fn detach_file(&self, id: &ProjectId, file_id: &FileId) -> FolioResult<ProjectFile> {
        self.modify(id, |project| {
            let position = position_by_prefix(&project.files, file_id.as_str(), |f| f.id.as_str())?
                .ok_or_else(|| FolioError::NotFound {
                    entity_type: "File",
                    identifier: file_id.to_string(),
                })?;
            Ok(project.files.remove(position))
        })
    }

    /// Bookmark a link, enriching it through `resolver`
    ///
    /// Preview resolution never fails; the only errors come from a blank URL,
    /// an unknown project or the store.
    pub fn add_link(
        &self,
        id: &ProjectId,
        url: &str,
        resolver: &dyn LinkResolver,
    ) -> FolioResult<ProjectLink> {
        if url.trim().is_empty() {
            return Err(FolioError::Validation("Link URL cannot be empty".into()));
        }
        if self.get(id)?.is_none() {
            return Err(FolioError::project_not_found(id.as_str()));
        }

        let link = fetch_preview(resolver, url).into_link();
        self.modify(id, |project| {
            project.links.push(link.clone());
            Ok(link)
        })
    }

    pub fn remove_link(&self, id: &ProjectId, link_id: &LinkId) -> FolioResult<ProjectLink> {
        self.modify(id, |project| {
            let position = position_by_prefix(&project.links, link_id.as_str(), |l| l.id.as_str())?
                .ok_or_else(|| FolioError::NotFound {
                    entity_type: "Link",
                    identifier: link_id.to_string(),
                })?;
            Ok(project.links.remove(position))
        })
    }

    pub fn count(&self) -> FolioResult<usize> {
        self.storage.projects.count()
    }

    /// Apply `change` to one project, refresh its timestamp and persist
    fn modify<R>(
        &self,
        id: &ProjectId,
        change: impl FnOnce(&mut Project) -> FolioResult<R>,
    ) -> FolioResult<R> {
        let mut projects = self.all()?;
        let project = projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| FolioError::project_not_found(id.as_str()))?;

        let result = change(project)?;
        project.touch();

        self.storage.projects.replace(projects)?;
        Ok(result)
    }
}

fn normalize_tags(tags: Vec<String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
