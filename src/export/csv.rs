//! CSV export of finance entries
//!
//! Category and description are always quoted, with embedded quotes
//! doubled, so any text survives a round trip through a conforming reader.

use std::io::Write;

use crate::error::{FolioError, FolioResult};
use crate::models::FinanceEntry;

/// Header row shared by export and import
pub const FINANCE_CSV_HEADER: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];

/// Export finance entries to CSV
pub fn export_finance_csv<W: Write>(entries: &[FinanceEntry], writer: &mut W) -> FolioResult<()> {
    writeln!(writer, "{}", FINANCE_CSV_HEADER.join(","))
        .map_err(|e| FolioError::Export(e.to_string()))?;

    for entry in entries {
        writeln!(
            writer,
            "{},{},{},{},{}",
            entry.date,
            entry.entry_type,
            quote_csv(&entry.category),
            entry.amount,
            quote_csv(&entry.description)
        )
        .map_err(|e| FolioError::Export(e.to_string()))?;
    }

    Ok(())
}

fn quote_csv(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use chrono::NaiveDate;

    #[test]
    fn test_export_finance_csv() {
        let entry = FinanceEntry::new(
            EntryType::Expense,
            42.5,
            "Food & Dining",
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        )
        .unwrap()
        .with_description("Dinner, \"the good place\"");

        let mut output = Vec::new();
        export_finance_csv(&[entry], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Date,Type,Category,Amount,Description"));
        assert_eq!(
            lines.next(),
            Some(r#"2024-01-20,expense,"Food & Dining",42.5,"Dinner, ""the good place""""#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_whole_amounts_have_no_fraction() {
        let entry = FinanceEntry::new(
            EntryType::Income,
            1000.0,
            "Salary",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
        .unwrap();

        let mut output = Vec::new();
        export_finance_csv(&[entry], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("2024-01-15,income,\"Salary\",1000,\"\""));
    }
}
