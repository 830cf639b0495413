//! Finance entry service
//!
//! Create, edit, delete and list income/expense entries.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{FolioError, FolioResult};
use crate::models::{EntryId, EntryType, FinanceEntry};
use crate::storage::Storage;

use super::{find_by_prefix, SortOrder};

/// Service for finance entry management
pub struct FinanceService<'a> {
    storage: &'a Storage,
}

/// Field a finance listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinanceSortKey {
    #[default]
    Date,
    Amount,
}

impl FromStr for FinanceSortKey {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            other => Err(FolioError::Validation(format!(
                "Unknown sort key '{}': expected date or amount",
                other
            ))),
        }
    }
}

/// Options for filtering finance entries
#[derive(Debug, Clone, Default)]
pub struct FinanceFilter {
    /// Case-insensitive match against description or category
    pub search: Option<String>,
    /// Restrict to one entry type
    pub entry_type: Option<EntryType>,
    pub sort_by: FinanceSortKey,
    pub order: SortOrder,
}

impl FinanceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    pub fn sort(mut self, sort_by: FinanceSortKey, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    fn matches(&self, entry: &FinanceEntry) -> bool {
        if let Some(entry_type) = self.entry_type {
            if entry.entry_type != entry_type {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                entry.description.to_lowercase().contains(&term)
                    || entry.category.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    fn compare(&self, a: &FinanceEntry, b: &FinanceEntry) -> Ordering {
        let ordering = match self.sort_by {
            FinanceSortKey::Date => a.date.cmp(&b.date),
            FinanceSortKey::Amount => a.amount.total_cmp(&b.amount),
        };
        self.order.apply(ordering)
    }
}

/// Input for creating a new finance entry
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    pub entry_type: EntryType,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Field changes for an existing entry; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct UpdateEntryInput {
    pub entry_type: Option<EntryType>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl<'a> FinanceService<'a> {
    /// Create a new finance service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new entry
    pub fn create(&self, input: CreateEntryInput) -> FolioResult<FinanceEntry> {
        let entry = FinanceEntry::new(input.entry_type, input.amount, input.category, input.date)?
            .with_description(input.description.trim());

        let mut entries = self.all()?;
        entries.push(entry.clone());
        self.storage.finance.replace(entries)?;

        tracing::debug!(id = %entry.id, "Created finance entry");
        Ok(entry)
    }

    pub fn get(&self, id: &EntryId) -> FolioResult<Option<FinanceEntry>> {
        let entries = self.storage.finance.snapshot()?;
        Ok(entries.iter().find(|e| &e.id == id).cloned())
    }

    /// Find an entry by full id or unique id prefix
    pub fn find(&self, identifier: &str) -> FolioResult<Option<FinanceEntry>> {
        let entries = self.storage.finance.snapshot()?;
        Ok(find_by_prefix(&entries, identifier, |e| e.id.as_str())?.cloned())
    }

    /// Every entry in stored order
    pub fn all(&self) -> FolioResult<Vec<FinanceEntry>> {
        Ok(self.storage.finance.snapshot()?.as_ref().clone())
    }

    /// Filtered and sorted entries
    pub fn list(&self, filter: &FinanceFilter) -> FolioResult<Vec<FinanceEntry>> {
        let entries = self.storage.finance.snapshot()?;
        let mut listed: Vec<FinanceEntry> = entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        listed.sort_by(|a, b| filter.compare(a, b));
        Ok(listed)
    }

    /// Replace an entry's fields by id
    pub fn update(&self, id: &EntryId, input: UpdateEntryInput) -> FolioResult<FinanceEntry> {
        let mut entries = self.all()?;
        let entry = entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| FolioError::entry_not_found(id.as_str()))?;

        if let Some(entry_type) = input.entry_type {
            entry.entry_type = entry_type;
        }
        if let Some(amount) = input.amount {
            entry.amount = amount;
        }
        if let Some(category) = input.category {
            entry.category = category.trim().to_string();
        }
        if let Some(description) = input.description {
            entry.description = description.trim().to_string();
        }
        if let Some(date) = input.date {
            entry.date = date;
        }
        entry.validate()?;
        entry.touch();

        let updated = entry.clone();
        self.storage.finance.replace(entries)?;
        Ok(updated)
    }

    /// Remove an entry, returning it
    pub fn delete(&self, id: &EntryId) -> FolioResult<FinanceEntry> {
        let mut entries = self.all()?;
        let position = entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| FolioError::entry_not_found(id.as_str()))?;
        let removed = entries.remove(position);
        self.storage.finance.replace(entries)?;

        tracing::debug!(id = %removed.id, "Deleted finance entry");
        Ok(removed)
    }

    pub fn count(&self) -> FolioResult<usize> {
        self.storage.finance.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(entry_type: EntryType, amount: f64, category: &str, day: u32) -> CreateEntryInput {
        CreateEntryInput {
            entry_type,
            amount,
            category: category.into(),
            description: String::new(),
            date: date(2024, 1, day),
        }
    }

    #[test]
    fn test_create_and_get() {
        let storage = Storage::in_memory();
        let service = FinanceService::new(&storage);

        let entry = service
            .create(input(EntryType::Income, 1000.0, "Salary", 15))
            .unwrap();
        assert_eq!(service.count().unwrap(), 1);

        let fetched = service.get(&entry.id).unwrap().unwrap();
        assert_eq!(fetched, entry);
        assert_eq!(service.find(entry.id.short()).unwrap().unwrap().id, entry.id);
    }

    #[test]
    fn test_create_rejects_invalid_amount() {
        let storage = Storage::in_memory();
        let service = FinanceService::new(&storage);

        let err = service
            .create(input(EntryType::Expense, -1.0, "Food", 1))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_update_refreshes_timestamp() {
        let storage = Storage::in_memory();
        let service = FinanceService::new(&storage);
        let entry = service.create(input(EntryType::Expense, 10.0, "Food", 1)).unwrap();

        let updated = service
            .update(
                &entry.id,
                UpdateEntryInput {
                    amount: Some(12.5),
                    description: Some("Lunch".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount, 12.5);
        assert_eq!(updated.description, "Lunch");
        assert_eq!(updated.created_at, entry.created_at);
        assert!(updated.updated_at >= entry.updated_at);
    }

    #[test]
    fn test_update_validation_leaves_entry_untouched() {
        let storage = Storage::in_memory();
        let service = FinanceService::new(&storage);
        let entry = service.create(input(EntryType::Expense, 10.0, "Food", 1)).unwrap();

        let err = service
            .update(
                &entry.id,
                UpdateEntryInput {
                    category: Some(" ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.get(&entry.id).unwrap().unwrap().category, "Food");
    }

    #[test]
    fn test_delete() {
        let storage = Storage::in_memory();
        let service = FinanceService::new(&storage);
        let entry = service.create(input(EntryType::Expense, 10.0, "Food", 1)).unwrap();

        service.delete(&entry.id).unwrap();
        assert_eq!(service.count().unwrap(), 0);
        assert!(service.delete(&entry.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_filter_and_sort() {
        let storage = Storage::in_memory();
        let service = FinanceService::new(&storage);
        service.create(input(EntryType::Income, 1000.0, "Salary", 15)).unwrap();
        service.create(input(EntryType::Expense, 400.0, "Food", 20)).unwrap();
        let mut coffee = input(EntryType::Expense, 5.0, "Food", 3);
        coffee.description = "Morning coffee".into();
        service.create(coffee).unwrap();

        let expenses = service
            .list(&FinanceFilter::new().entry_type(EntryType::Expense))
            .unwrap();
        assert_eq!(expenses.len(), 2);
        // Newest first by default
        assert_eq!(expenses[0].date, date(2024, 1, 20));

        let by_amount = service
            .list(&FinanceFilter::new().sort(FinanceSortKey::Amount, SortOrder::Asc))
            .unwrap();
        let amounts: Vec<f64> = by_amount.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![5.0, 400.0, 1000.0]);

        let coffee = service.list(&FinanceFilter::new().search("COFFEE")).unwrap();
        assert_eq!(coffee.len(), 1);

        let food = service.list(&FinanceFilter::new().search("food")).unwrap();
        assert_eq!(food.len(), 2);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("Amount".parse::<FinanceSortKey>().unwrap(), FinanceSortKey::Amount);
        assert!("size".parse::<FinanceSortKey>().is_err());
    }
}
