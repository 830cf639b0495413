//! Service layer for Folio
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, timestamps and cross-entity operations. Every
//! mutation builds a new collection from the current snapshot and hands it
//! to the repository in one piece.

pub mod finance;
pub mod import;
pub mod project;

pub use finance::{CreateEntryInput, FinanceFilter, FinanceService, FinanceSortKey, UpdateEntryInput};
pub use import::{
    parse_backup, parse_finance_csv, parse_finance_json, parse_projects_json, BackupImport,
    ImportService, ImportSummary, MergePolicy, RestoreOptions, RestoreSummary,
};
pub use project::{
    AttachOutcome, CreateProjectInput, EntryInput, EntrySortKey, IncomingFile, ProjectFilter,
    ProjectService, RejectedFile, UpdateProjectInput,
};

use std::str::FromStr;

use crate::error::FolioError;

/// Direction of a sorted listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Apply this order to an ascending comparison
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(FolioError::Validation(format!(
                "Unknown sort order '{}': expected asc or desc",
                other
            ))),
        }
    }
}

/// Pick the single item whose id equals `identifier`, or else the only one
/// whose id starts with it
pub(crate) fn find_by_prefix<'t, T>(
    items: &'t [T],
    identifier: &str,
    id_of: impl Fn(&T) -> &str,
) -> Result<Option<&'t T>, FolioError> {
    Ok(position_by_prefix(items, identifier, id_of)?.and_then(|i| items.get(i)))
}

/// Index of the item [`find_by_prefix`] would pick
pub(crate) fn position_by_prefix<T>(
    items: &[T],
    identifier: &str,
    id_of: impl Fn(&T) -> &str,
) -> Result<Option<usize>, FolioError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Ok(None);
    }
    if let Some(exact) = items.iter().position(|item| id_of(item) == identifier) {
        return Ok(Some(exact));
    }

    let mut matches = items
        .iter()
        .enumerate()
        .filter(|(_, item)| id_of(item).starts_with(identifier))
        .map(|(i, _)| i);
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        return Err(FolioError::Validation(format!(
            "Identifier '{}' is ambiguous; use more characters",
            identifier
        )));
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_apply() {
        use std::cmp::Ordering;
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_find_by_prefix() {
        let ids = vec!["abc123".to_string(), "abd456".to_string(), "abc".to_string()];
        fn id_of(s: &String) -> &str {
            s.as_str()
        }

        assert_eq!(find_by_prefix(&ids, "abc", id_of).unwrap().map(String::as_str), Some("abc"));
        assert_eq!(find_by_prefix(&ids, "abd", id_of).unwrap().map(String::as_str), Some("abd456"));
        assert!(find_by_prefix(&ids, "ab", id_of).is_err());
        assert!(find_by_prefix(&ids, "zz", id_of).unwrap().is_none());
        assert!(find_by_prefix(&ids, " ", id_of).unwrap().is_none());
    }

    #[test]
    fn test_exact_id_wins_over_earlier_prefix_match() {
        fn id_of(s: &String) -> &str {
            s.as_str()
        }
        let ids = vec!["17000".to_string(), "1700".to_string()];

        assert_eq!(position_by_prefix(&ids, "1700", id_of).unwrap(), Some(1));
        assert_eq!(position_by_prefix(&ids, "17000", id_of).unwrap(), Some(0));
        assert!(position_by_prefix(&ids, "170", id_of).unwrap_err().is_validation());
    }
}
