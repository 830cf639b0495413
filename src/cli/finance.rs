//! Finance CLI commands
//!
//! Implements CLI commands for income and expense entries.

use clap::Subcommand;

use super::{date_or_today, parse_date};
use crate::config::settings::Settings;
use crate::display::{format_entry_details, format_entry_list};
use crate::error::{FolioError, FolioResult};
use crate::models::EntryType;
use crate::reports::{format_trend, monthly_totals, today, CategorySummary, FinanceSummary, TREND_MONTHS};
use crate::services::{
    CreateEntryInput, FinanceFilter, FinanceService, FinanceSortKey, SortOrder, UpdateEntryInput,
};
use crate::storage::Storage;

/// Finance subcommands
#[derive(Subcommand)]
pub enum FinanceCommands {
    /// Record an income or expense
    Add {
        /// Entry type (income, expense)
        entry_type: String,
        /// Amount (e.g., "1500" or "12.50")
        amount: f64,
        /// Category name
        category: String,
        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Entry date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List entries
    List {
        /// Search description and category
        #[arg(short, long)]
        search: Option<String>,
        /// Only show one type (income, expense)
        #[arg(short = 't', long = "type")]
        entry_type: Option<String>,
        /// Sort by date or amount
        #[arg(long, default_value = "date")]
        sort: String,
        /// Sort order (asc, desc)
        #[arg(long, default_value = "desc")]
        order: String,
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show entry details
    Show {
        /// Entry ID or ID prefix
        entry: String,
    },
    /// Edit an entry
    Edit {
        /// Entry ID or ID prefix
        entry: String,
        #[arg(short = 't', long = "type")]
        entry_type: Option<String>,
        #[arg(short, long)]
        amount: Option<f64>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an entry
    Delete {
        /// Entry ID or ID prefix
        entry: String,
    },
    /// Show all-time and current-month totals
    Summary,
    /// Show totals per category
    Categories {
        /// Entry type to break down (income, expense)
        #[arg(short = 't', long = "type", default_value = "expense")]
        entry_type: String,
        /// List the suggested categories instead of totals
        #[arg(long)]
        defaults: bool,
    },
    /// Show income and expenses over recent months
    Trend {
        /// Number of months to show
        #[arg(short, long, default_value_t = TREND_MONTHS)]
        months: u32,
    },
}

/// Handle a finance command
pub fn handle_finance_command(
    storage: &Storage,
    settings: &Settings,
    cmd: FinanceCommands,
) -> FolioResult<()> {
    let service = FinanceService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        FinanceCommands::Add {
            entry_type,
            amount,
            category,
            description,
            date,
        } => {
            let entry = service.create(CreateEntryInput {
                entry_type: entry_type.parse()?,
                amount,
                category,
                description,
                date: date_or_today(date.as_deref())?,
            })?;

            println!("Recorded {}: {}", entry.entry_type, entry.category);
            println!("  Amount: {}", crate::display::format_money(entry.amount, currency));
            println!("  Date:   {}", entry.date.format(&settings.date_format));
            println!("  ID:     {}", entry.id);
        }

        FinanceCommands::List {
            search,
            entry_type,
            sort,
            order,
            limit,
        } => {
            let mut filter = FinanceFilter::new().sort(
                sort.parse::<FinanceSortKey>()?,
                order.parse::<SortOrder>()?,
            );
            if let Some(term) = search {
                filter = filter.search(term);
            }
            if let Some(entry_type) = entry_type {
                filter = filter.entry_type(entry_type.parse()?);
            }

            let mut entries = service.list(&filter)?;
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            print!("{}", format_entry_list(&entries, currency));
        }

        FinanceCommands::Show { entry } => {
            let found = service
                .find(&entry)?
                .ok_or_else(|| FolioError::entry_not_found(&entry))?;
            print!("{}", format_entry_details(&found, currency));
        }

        FinanceCommands::Edit {
            entry,
            entry_type,
            amount,
            category,
            description,
            date,
        } => {
            let found = service
                .find(&entry)?
                .ok_or_else(|| FolioError::entry_not_found(&entry))?;

            let input = UpdateEntryInput {
                entry_type: entry_type.map(|t| t.parse()).transpose()?,
                amount,
                category,
                description,
                date: date.as_deref().map(parse_date).transpose()?,
            };
            let updated = service.update(&found.id, input)?;
            println!("Updated entry {}", updated.id);
        }

        FinanceCommands::Delete { entry } => {
            let found = service
                .find(&entry)?
                .ok_or_else(|| FolioError::entry_not_found(&entry))?;
            let removed = service.delete(&found.id)?;
            println!(
                "Deleted {} entry: {} {}",
                removed.entry_type,
                removed.category,
                crate::display::format_money(removed.amount, currency)
            );
        }

        FinanceCommands::Summary => {
            let entries = service.all()?;
            print!("{}", FinanceSummary::calculate(&entries).format_terminal(currency));
        }

        FinanceCommands::Categories {
            entry_type,
            defaults,
        } => {
            let entry_type: EntryType = entry_type.parse()?;
            if defaults {
                for category in entry_type.default_categories() {
                    println!("{}", category);
                }
                return Ok(());
            }
            let entries = service.all()?;
            let summaries = CategorySummary::for_type(&entries, entry_type);
            print!(
                "{}",
                CategorySummary::format_terminal(&summaries, entry_type, currency)
            );
        }

        FinanceCommands::Trend { months } => {
            if months == 0 {
                return Err(FolioError::Validation("Months must be at least 1".into()));
            }
            let entries = service.all()?;
            let totals = monthly_totals(&entries, today(), months);
            print!("{}", format_trend(&totals, currency));
        }
    }

    Ok(())
}
