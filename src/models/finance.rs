//! Finance entry model
//!
//! A single income or expense transaction. Amounts are stored as plain
//! non-negative numbers; the entry type decides the direction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::EntryId;
use super::touch;
use crate::error::{FolioError, FolioResult};

/// Default categories offered for income entries
pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Business",
    "Investment",
    "Rental",
    "Gift",
    "Other Income",
];

/// Default categories offered for expense entries
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Insurance",
    "Investment",
    "Other Expense",
];

/// Direction of a finance entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Default category list for this type
    pub fn default_categories(&self) -> &'static [&'static str] {
        match self {
            Self::Income => INCOME_CATEGORIES,
            Self::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(FolioError::Validation(format!(
                "Unknown entry type '{}': expected income or expense",
                other
            ))),
        }
    }
}

/// A finance transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceEntry {
    pub id: EntryId,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Non-negative amount
    pub amount: f64,

    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Calendar date of the transaction
    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl FinanceEntry {
    /// Create a new entry, validating the amount and category
    pub fn new(
        entry_type: EntryType,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> FolioResult<Self> {
        let category = category.into().trim().to_string();
        validate_amount(amount)?;
        validate_category(&category)?;

        let now = Utc::now();
        Ok(Self {
            id: EntryId::new(),
            entry_type,
            amount,
            category,
            description: String::new(),
            date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the invariants that deserialization alone cannot enforce
    pub fn validate(&self) -> FolioResult<()> {
        validate_amount(self.amount)?;
        validate_category(&self.category)
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        touch(&mut self.updated_at);
    }
}

fn validate_amount(amount: f64) -> FolioResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(FolioError::Validation(format!(
            "Amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

fn validate_category(category: &str) -> FolioResult<()> {
    if category.trim().is_empty() {
        return Err(FolioError::Validation("Category cannot be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_entry() {
        let entry = FinanceEntry::new(EntryType::Income, 1000.0, " Salary ", date(2024, 1, 15))
            .unwrap()
            .with_description("January pay");

        assert_eq!(entry.category, "Salary");
        assert_eq!(entry.description, "January pay");
        assert_eq!(entry.entry_type, EntryType::Income);
        assert_eq!(entry.created_at, entry.updated_at);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let err = FinanceEntry::new(EntryType::Expense, -5.0, "Food", date(2024, 1, 1)).unwrap_err();
        assert!(err.is_validation());

        let err = FinanceEntry::new(EntryType::Expense, f64::NAN, "Food", date(2024, 1, 1)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_empty_category() {
        let err = FinanceEntry::new(EntryType::Expense, 5.0, "   ", date(2024, 1, 1)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "id": "1705312800000",
            "type": "expense",
            "amount": 42.5,
            "category": "Food & Dining",
            "description": "Lunch",
            "date": "2024-01-15",
            "createdAt": "2024-01-15T10:00:00.000Z",
            "updatedAt": "2024-01-15T10:00:00.000Z"
        }"#;

        let entry: FinanceEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id.as_str(), "1705312800000");
        assert_eq!(entry.entry_type, EntryType::Expense);
        assert_eq!(entry.amount, 42.5);
        assert_eq!(entry.date, date(2024, 1, 15));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "expense");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("entry_type").is_none());
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let json = r#"{"id":"1","type":"income","amount":1,"category":"Gift","date":"2024-02-01",
            "createdAt":"2024-02-01T00:00:00Z","updatedAt":"2024-02-01T00:00:00Z"}"#;
        let entry: FinanceEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_entry_type_parse() {
        assert_eq!("Income".parse::<EntryType>().unwrap(), EntryType::Income);
        assert_eq!(" expense ".parse::<EntryType>().unwrap(), EntryType::Expense);
        assert!("transfer".parse::<EntryType>().is_err());
    }
}
