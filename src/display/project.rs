//! Project display formatting

use crate::models::Project;

use super::report::{format_bytes, format_money, truncate};

/// Format a list of projects as a table
pub fn format_project_list(projects: &[Project], currency: &str) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:<28} {:<12} {:>8} {:>18}  {}\n",
        "ID", "Title", "Status", "Progress", "Cost", "Tags"
    ));
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for project in projects {
        let tags: Vec<&str> = project.tags.iter().map(String::as_str).collect();
        output.push_str(&format!(
            "{:<8} {:<28} {:<12} {:>7.0}% {:>18}  {}\n",
            project.id.short(),
            truncate(&project.title, 28),
            project.status.label(),
            project.average_progress(),
            format_money(project.total_cost(), currency),
            tags.join(", ")
        ));
    }

    output
}

/// Format a project with its entries, files and links
pub fn format_project_details(project: &Project, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Project:  {}\n", project.title));
    output.push_str(&format!("ID:       {}\n", project.id));
    output.push_str(&format!("Status:   {}\n", project.status.label()));
    output.push_str(&format!("Type:     {}\n", project.type_label()));
    if !project.client_name.is_empty() {
        output.push_str(&format!("Client:   {}\n", project.client_name));
    }
    if !project.tags.is_empty() {
        let tags: Vec<&str> = project.tags.iter().map(String::as_str).collect();
        output.push_str(&format!("Tags:     {}\n", tags.join(", ")));
    }
    output.push_str(&format!("Progress: {:.0}%\n", project.average_progress()));
    output.push_str(&format!("Cost:     {}\n", format_money(project.total_cost(), currency)));
    output.push_str(&format!(
        "Created:  {}   Updated: {}\n",
        project.created_at.format("%Y-%m-%d %H:%M"),
        project.updated_at.format("%Y-%m-%d %H:%M")
    ));
    if !project.description.is_empty() {
        output.push_str(&format!("\n{}\n", project.description));
    }
    if !project.notes.is_empty() {
        output.push_str(&format!("\nNotes: {}\n", project.notes));
    }

    output.push_str(&format!("\nEntries ({})\n", project.entries.len()));
    for entry in &project.entries {
        let end = entry
            .end_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "...".to_string());
        output.push_str(&format!(
            "  {:<8} {:<24} {} to {:<10} {:>4}% {:<12} {:>16}\n",
            entry.id.short(),
            truncate(&entry.title, 24),
            entry.start_date.format("%Y-%m-%d"),
            end,
            entry.progress,
            entry.status.as_str(),
            format_money(entry.cost, currency)
        ));
    }

    output.push_str(&format!("\nFiles ({})\n", project.files.len()));
    for file in &project.files {
        output.push_str(&format!(
            "  {:<8} {:<32} {:>10}  {}\n",
            file.id.short(),
            truncate(&file.name, 32),
            format_bytes(file.size),
            file.mime_type
        ));
    }

    output.push_str(&format!("\nLinks ({})\n", project.links.len()));
    for link in &project.links {
        let title = link.title.as_deref().unwrap_or(&link.url);
        output.push_str(&format!("  {:<8} {}  <{}>\n", link.id.short(), truncate(title, 40), link.url));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectEntry, ProjectFile};
    use chrono::NaiveDate;

    #[test]
    fn test_project_list_and_details() {
        let mut project = Project::new("Website");
        project.tags.insert("web".into());
        let mut entry = ProjectEntry::new("Design", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        entry.progress = 60;
        entry.cost = 1500.0;
        project.entries.push(entry);
        project
            .files
            .push(ProjectFile::from_bytes("brief.txt", "text/plain", b"hi").unwrap());

        let list = format_project_list(&[project.clone()], "Rs.");
        assert!(list.contains("Website"));
        assert!(list.contains("60%"));
        assert!(list.contains("Rs. 1,500.00"));

        let details = format_project_details(&project, "Rs.");
        assert!(details.contains("Entries (1)"));
        assert!(details.contains("brief.txt"));
        assert!(details.contains("2 Bytes"));
        assert!(details.contains("Links (0)"));
        assert!(details.contains("Type:     Unspecified"));
    }
}
