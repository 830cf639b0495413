//! Project reports
//!
//! Status and type distributions, cost roll-ups, the monthly creation trend
//! and the distribution of average entry progress.

use chrono::{Local, NaiveDate};
use std::fmt;

use crate::display::{format_bar, format_money, format_percentage, separator, truncate};
use crate::models::{Project, ProjectStatus};

use super::{month_label, percentage, same_month, today, trailing_months, TREND_MONTHS};

/// Number of projects in one status
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub status: ProjectStatus,
    pub count: usize,
    pub percentage: f64,
}

impl StatusCount {
    /// Title-cased label, e.g. `In Progress`
    pub fn label(&self) -> &'static str {
        self.status.label()
    }
}

/// Number of projects and their cost for one project type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCount {
    /// Project type, `Unspecified` when blank
    pub project_type: String,
    pub count: usize,
    pub percentage: f64,
    pub total_cost: f64,
}

/// Projects created within one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyCreation {
    pub month: NaiveDate,
    pub label: String,
    pub projects: usize,
    pub total_cost: f64,
}

/// Range of average entry progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBucket {
    UpTo25,
    UpTo50,
    UpTo75,
    UpTo100,
}

impl ProgressBucket {
    pub const ALL: [ProgressBucket; 4] = [Self::UpTo25, Self::UpTo50, Self::UpTo75, Self::UpTo100];

    /// Bucket holding an average progress value
    pub fn for_progress(progress: f64) -> Self {
        if progress <= 25.0 {
            Self::UpTo25
        } else if progress <= 50.0 {
            Self::UpTo50
        } else if progress <= 75.0 {
            Self::UpTo75
        } else {
            Self::UpTo100
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::UpTo25 => "0-25%",
            Self::UpTo50 => "26-50%",
            Self::UpTo75 => "51-75%",
            Self::UpTo100 => "76-100%",
        }
    }
}

impl fmt::Display for ProgressBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressCount {
    pub bucket: ProgressBucket,
    pub count: usize,
}

/// Statistics over a list of projects
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReport {
    pub total_projects: usize,
    pub total_entries: usize,
    /// Sum of every entry's cost across all projects
    pub total_cost: f64,
    pub completed_projects: usize,
    /// Statuses present, in lifecycle order
    pub by_status: Vec<StatusCount>,
    /// Types in order of first appearance
    pub by_type: Vec<TypeCount>,
    pub monthly_trend: Vec<MonthlyCreation>,
    /// Always four buckets, lowest range first
    pub progress_distribution: Vec<ProgressCount>,
}

impl ProjectReport {
    /// Report relative to the current local date
    pub fn generate(projects: &[Project]) -> Self {
        Self::generate_at(projects, today())
    }

    /// Report whose trend window ends with the month of `today`
    pub fn generate_at(projects: &[Project], today: NaiveDate) -> Self {
        let total = projects.len() as f64;

        let by_status = ProjectStatus::ALL
            .into_iter()
            .filter_map(|status| {
                let count = projects.iter().filter(|p| p.status == status).count();
                (count > 0).then(|| StatusCount {
                    status,
                    count,
                    percentage: percentage(count as f64, total),
                })
            })
            .collect();

        let mut by_type: Vec<TypeCount> = Vec::new();
        for project in projects {
            let label = project.type_label();
            let cost = project.total_cost();
            match by_type.iter_mut().find(|t| t.project_type == label) {
                Some(existing) => {
                    existing.count += 1;
                    existing.total_cost += cost;
                }
                None => by_type.push(TypeCount {
                    project_type: label.to_string(),
                    count: 1,
                    percentage: 0.0,
                    total_cost: cost,
                }),
            }
        }
        for row in &mut by_type {
            row.percentage = percentage(row.count as f64, total);
        }

        let monthly_trend = trailing_months(today, TREND_MONTHS)
            .into_iter()
            .map(|month| {
                let created: Vec<&Project> = projects
                    .iter()
                    .filter(|p| {
                        same_month(p.created_at.with_timezone(&Local).date_naive(), month)
                    })
                    .collect();
                MonthlyCreation {
                    month,
                    label: month_label(month),
                    projects: created.len(),
                    total_cost: created.iter().map(|p| p.total_cost()).sum(),
                }
            })
            .collect();

        let progress_distribution = ProgressBucket::ALL
            .into_iter()
            .map(|bucket| ProgressCount {
                bucket,
                count: projects
                    .iter()
                    .filter(|p| ProgressBucket::for_progress(p.average_progress()) == bucket)
                    .count(),
            })
            .collect();

        Self {
            total_projects: projects.len(),
            total_entries: projects.iter().map(|p| p.entries.len()).sum(),
            total_cost: projects.iter().map(|p| p.total_cost()).sum(),
            completed_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Completed)
                .count(),
            by_status,
            by_type,
            monthly_trend,
            progress_distribution,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        if self.total_projects == 0 {
            output.push_str("No project data available\n");
            return output;
        }

        output.push_str(&format!("Total Projects:  {}\n", self.total_projects));
        output.push_str(&format!("Project Entries: {}\n", self.total_entries));
        output.push_str(&format!("Total Cost:      {}\n", format_money(self.total_cost, currency)));
        output.push_str(&format!("Completed:       {}\n\n", self.completed_projects));

        output.push_str("By status\n");
        output.push_str(&separator(60));
        output.push('\n');
        for row in &self.by_status {
            output.push_str(&format!(
                "{:<16} {:>5} {:>7}\n",
                row.label(),
                row.count,
                format_percentage(row.percentage)
            ));
        }

        output.push_str("\nBy type\n");
        output.push_str(&separator(60));
        output.push('\n');
        for row in &self.by_type {
            output.push_str(&format!(
                "{:<22} {:>5} {:>7} {:>18}\n",
                truncate(&row.project_type, 22),
                row.count,
                format_percentage(row.percentage),
                format_money(row.total_cost, currency)
            ));
        }

        output.push_str("\nCreated per month\n");
        output.push_str(&separator(60));
        output.push('\n');
        let max = self
            .monthly_trend
            .iter()
            .map(|m| m.projects as f64)
            .fold(0.0, f64::max);
        for month in &self.monthly_trend {
            output.push_str(&format!(
                "{:<10} {:>4} {} {:>18}\n",
                month.label,
                month.projects,
                format_bar(month.projects as f64, max, 12),
                format_money(month.total_cost, currency)
            ));
        }

        output.push_str("\nAverage progress\n");
        output.push_str(&separator(60));
        output.push('\n');
        for row in &self.progress_distribution {
            output.push_str(&format!("{:<10} {:>4}\n", row.bucket.label(), row.count));
        }

        output
    }
}
