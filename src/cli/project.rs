//! Project CLI commands
//!
//! Implements CLI commands for projects and their entries, files and links.

use clap::Subcommand;
use std::path::PathBuf;

use super::{date_or_today, parse_date};
use crate::config::settings::Settings;
use crate::display::{format_bytes, format_money, format_project_details, format_project_list};
use crate::error::{FolioError, FolioResult};
use crate::links::resolver_from_settings;
use crate::models::{EntryStatus, FileId, LinkId, Project, ProjectEntry, ProjectStatus};
use crate::reports::ProjectReport;
use crate::services::{
    find_by_prefix, CreateProjectInput, EntryInput, EntrySortKey, ProjectFilter, ProjectService,
    SortOrder, UpdateProjectInput,
};
use crate::storage::Storage;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project
    Add {
        /// Project title
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Client name
        #[arg(short, long, default_value = "")]
        client: String,
        /// Project type (e.g., "Web Development")
        #[arg(short = 't', long = "type", default_value = "")]
        project_type: String,
        /// Status (planning, in-progress, completed, on-hold, cancelled)
        #[arg(short, long, default_value = "planning")]
        status: String,
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List projects
    List {
        /// Search title and description
        #[arg(short, long)]
        search: Option<String>,
        /// Only projects with any of these tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show project details
    Show {
        /// Project ID or ID prefix
        project: String,
    },
    /// Edit a project
    Edit {
        /// Project ID or ID prefix
        project: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        client: Option<String>,
        #[arg(short = 't', long = "type")]
        project_type: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Replace all tags (repeatable)
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// Delete a project with all its entries, files and links
    Delete {
        /// Project ID or ID prefix
        project: String,
    },
    /// Copy a project under a new ID
    Duplicate {
        /// Project ID or ID prefix
        project: String,
    },
    /// List all tags in use
    Tags,
    /// Show the project report
    Report,
    /// List a project's entries in order
    Entries {
        /// Project ID or ID prefix
        project: String,
        /// Sort by start-date, progress or cost
        #[arg(long, default_value = "start-date")]
        sort: String,
        /// Sort order (asc, desc)
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Add a progress entry
    EntryAdd {
        /// Project ID or ID prefix
        project: String,
        /// Entry title
        title: String,
        /// Start date (YYYY-MM-DD, default today)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Progress percentage (0-100)
        #[arg(short, long, default_value_t = 0.0)]
        progress: f64,
        #[arg(long, default_value_t = 0.0)]
        cost: f64,
        /// Status (not-started, in-progress, completed, cancelled)
        #[arg(short, long, default_value = "not-started")]
        status: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Edit a progress entry
    EntryEdit {
        /// Project ID or ID prefix
        project: String,
        /// Entry ID or ID prefix
        entry: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        progress: Option<f64>,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(short, long)]
        status: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a progress entry
    EntryDelete {
        /// Project ID or ID prefix
        project: String,
        /// Entry ID or ID prefix
        entry: String,
    },
    /// Attach files to a project
    Attach {
        /// Project ID or ID prefix
        project: String,
        /// Files to attach
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Remove an attached file
    Detach {
        /// Project ID or ID prefix
        project: String,
        /// File ID or ID prefix
        file: String,
    },
    /// Save an attached file to disk
    Download {
        /// Project ID or ID prefix
        project: String,
        /// File ID or ID prefix
        file: String,
        /// Output path (defaults to the attachment name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Bookmark a link
    Link {
        /// Project ID or ID prefix
        project: String,
        /// URL to bookmark
        url: String,
    },
    /// Remove a bookmarked link
    Unlink {
        /// Project ID or ID prefix
        project: String,
        /// Link ID or ID prefix
        link: String,
    },
}

/// Handle a project command
pub fn handle_project_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ProjectCommands,
) -> FolioResult<()> {
    let service = ProjectService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ProjectCommands::Add {
            title,
            description,
            client,
            project_type,
            status,
            notes,
            tags,
        } => {
            let project = service.create(CreateProjectInput {
                title,
                description,
                client_name: client,
                project_type,
                status: status.parse()?,
                notes,
                tags,
            })?;

            println!("Created project: {}", project.title);
            println!("  Status: {}", project.status.label());
            println!("  ID: {}", project.id);
        }

        ProjectCommands::List { search, tags } => {
            let mut filter = ProjectFilter::new();
            if let Some(term) = search {
                filter = filter.search(term);
            }
            for tag in tags {
                filter = filter.tag(tag);
            }
            let projects = service.list(&filter)?;
            print!("{}", format_project_list(&projects, currency));
        }

        ProjectCommands::Show { project } => {
            let found = service.resolve(&project)?;
            print!("{}", format_project_details(&found, currency));
        }

        ProjectCommands::Edit {
            project,
            title,
            description,
            client,
            project_type,
            status,
            notes,
            tags,
        } => {
            let found = service.resolve(&project)?;
            let input = UpdateProjectInput {
                title,
                description,
                client_name: client,
                project_type,
                status: status.map(|s| s.parse::<ProjectStatus>()).transpose()?,
                notes,
                tags,
            };
            let updated = service.update(&found.id, input)?;
            println!("Updated project: {}", updated.title);
        }

        ProjectCommands::Delete { project } => {
            let found = service.resolve(&project)?;
            let removed = service.delete(&found.id)?;
            println!(
                "Deleted project: {} ({} entries, {} files, {} links)",
                removed.title,
                removed.entries.len(),
                removed.files.len(),
                removed.links.len()
            );
        }

        ProjectCommands::Duplicate { project } => {
            let found = service.resolve(&project)?;
            let copy = service.duplicate(&found.id)?;
            println!("Created project: {}", copy.title);
            println!("  ID: {}", copy.id);
        }

        ProjectCommands::Tags => {
            let tags = service.all_tags()?;
            if tags.is_empty() {
                println!("No tags found.");
            }
            for tag in tags {
                println!("{}", tag);
            }
        }

        ProjectCommands::Report => {
            let projects = service.all()?;
            print!("{}", ProjectReport::generate(&projects).format_terminal(currency));
        }

        ProjectCommands::Entries { project, sort, order } => {
            let found = service.resolve(&project)?;
            let entries = service.sorted_entries(
                &found.id,
                sort.parse::<EntrySortKey>()?,
                order.parse::<SortOrder>()?,
            )?;
            if entries.is_empty() {
                println!("No entries found.");
            }
            for entry in entries {
                println!(
                    "{:<8} {:<10} {:>4}% {:<12} {:>16}  {}",
                    entry.id.short(),
                    entry.start_date.format("%Y-%m-%d").to_string(),
                    entry.progress,
                    entry.status.as_str(),
                    format_money(entry.cost, currency),
                    entry.title
                );
            }
        }

        ProjectCommands::EntryAdd {
            project,
            title,
            start,
            end,
            progress,
            cost,
            status,
            category,
            description,
            notes,
        } => {
            let found = service.resolve(&project)?;
            let mut input = EntryInput::new(title, date_or_today(start.as_deref())?);
            input.end_date = end.as_deref().map(parse_date).transpose()?;
            input.progress = progress;
            input.cost = cost;
            input.status = status.parse()?;
            input.category = category;
            input.description = description;
            input.notes = notes;

            let entry = service.add_entry(&found.id, input)?;
            println!("Added entry to {}: {}", found.title, entry.title);
            println!("  ID: {}", entry.id);
        }

        ProjectCommands::EntryEdit {
            project,
            entry,
            title,
            start,
            end,
            progress,
            cost,
            status,
            category,
            description,
            notes,
        } => {
            let found = service.resolve(&project)?;
            let existing = find_entry(&found, &entry)?;

            let input = EntryInput {
                title: title.unwrap_or(existing.title),
                description: description.unwrap_or(existing.description),
                start_date: match start {
                    Some(start) => parse_date(&start)?,
                    None => existing.start_date,
                },
                end_date: match end {
                    Some(end) => Some(parse_date(&end)?),
                    None => existing.end_date,
                },
                progress: progress.unwrap_or(f64::from(existing.progress)),
                cost: cost.unwrap_or(existing.cost),
                status: match status {
                    Some(status) => status.parse::<EntryStatus>()?,
                    None => existing.status,
                },
                category: category.unwrap_or(existing.category),
                notes: notes.unwrap_or(existing.notes),
            };
            let updated = service.update_entry(&found.id, &existing.id, input)?;
            println!("Updated entry: {}", updated.title);
        }

        ProjectCommands::EntryDelete { project, entry } => {
            let found = service.resolve(&project)?;
            let existing = find_entry(&found, &entry)?;
            let removed = service.delete_entry(&found.id, &existing.id)?;
            println!("Deleted entry: {}", removed.title);
        }

        ProjectCommands::Attach { project, files } => {
            let found = service.resolve(&project)?;
            let outcome = service.attach_paths(&found.id, &files)?;
            for file in &outcome.attached {
                println!("Attached {} ({})", file.name, format_bytes(file.size));
            }
            for rejected in &outcome.rejected {
                eprintln!("Skipped {}: {}", rejected.name, rejected.reason);
            }
        }

        ProjectCommands::Detach { project, file } => {
            let found = service.resolve(&project)?;
            let removed = service.detach_file(&found.id, &FileId::from(file.as_str()))?;
            println!("Removed file: {}", removed.name);
        }

        ProjectCommands::Download {
            project,
            file,
            output,
        } => {
            let found = service.resolve(&project)?;
            let attachment = find_by_prefix(&found.files, &file, |f| f.id.as_str())?
                .ok_or_else(|| FolioError::NotFound {
                    entity_type: "File",
                    identifier: file.clone(),
                })?;

            let output = output.unwrap_or_else(|| PathBuf::from(&attachment.name));
            let bytes = attachment.decode()?;
            std::fs::write(&output, bytes).map_err(|e| {
                FolioError::Io(format!("Failed to write {}: {}", output.display(), e))
            })?;
            println!("Saved {} to {}", attachment.name, output.display());
        }

        ProjectCommands::Link { project, url } => {
            let found = service.resolve(&project)?;
            let resolver = resolver_from_settings(&settings.link_preview)?;
            let link = service.add_link(&found.id, &url, resolver.as_ref())?;
            println!(
                "Added link: {}",
                link.title.as_deref().unwrap_or(link.url.as_str())
            );
            println!("  URL: {}", link.url);
            println!("  ID: {}", link.id);
        }

        ProjectCommands::Unlink { project, link } => {
            let found = service.resolve(&project)?;
            let removed = service.remove_link(&found.id, &LinkId::from(link.as_str()))?;
            println!("Removed link: {}", removed.url);
        }
    }

    Ok(())
}

/// Find a project entry by full id or unique id prefix
fn find_entry(project: &Project, identifier: &str) -> FolioResult<ProjectEntry> {
    find_by_prefix(&project.entries, identifier, |e| e.id.as_str())?
        .cloned()
        .ok_or_else(|| FolioError::project_entry_not_found(identifier))
}
