//! Finance entry display formatting

use crate::models::{EntryType, FinanceEntry};

use super::report::{format_money, truncate};

/// Format one entry as a table row
fn format_entry_row(entry: &FinanceEntry, currency: &str) -> String {
    let signed = match entry.entry_type {
        EntryType::Income => format!("+{}", format_money(entry.amount, currency)),
        EntryType::Expense => format!("-{}", format_money(entry.amount, currency)),
    };
    format!(
        "{:<8} {:<10} {:<8} {:<20} {:>18}  {}",
        entry.id.short(),
        entry.date.format("%Y-%m-%d"),
        entry.entry_type.as_str(),
        truncate(&entry.category, 20),
        signed,
        truncate(&entry.description, 30)
    )
}

/// Format a list of entries as a table
pub fn format_entry_list(entries: &[FinanceEntry], currency: &str) -> String {
    if entries.is_empty() {
        return "No entries found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:<10} {:<8} {:<20} {:>18}  {}\n",
        "ID", "Date", "Type", "Category", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for entry in entries {
        output.push_str(&format_entry_row(entry, currency));
        output.push('\n');
    }

    output
}

/// Format entry details for display
pub fn format_entry_details(entry: &FinanceEntry, currency: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Entry:       {}\n", entry.id));
    output.push_str(&format!("Type:        {}\n", entry.entry_type));
    output.push_str(&format!("Date:        {}\n", entry.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", format_money(entry.amount, currency)));
    output.push_str(&format!("Category:    {}\n", entry.category));
    if !entry.description.is_empty() {
        output.push_str(&format!("Description: {}\n", entry.description));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_entry_list() {
        let entry = FinanceEntry::new(
            EntryType::Expense,
            400.0,
            "Food",
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        )
        .unwrap()
        .with_description("Groceries");

        let text = format_entry_list(&[entry.clone()], "Rs.");
        assert!(text.contains("-Rs. 400.00"));
        assert!(text.contains("Groceries"));
        assert!(text.contains(entry.id.short()));

        assert_eq!(format_entry_list(&[], "Rs."), "No entries found.\n");
        assert!(format_entry_details(&entry, "Rs.").contains("Description: Groceries"));
    }
}
