//! Display formatting for terminal output
//!
//! Plain-text tables for finance entries and projects, plus the small
//! formatting helpers the reports share.

pub mod finance;
pub mod project;
pub mod report;

pub use finance::{format_entry_details, format_entry_list};
pub use project::{format_project_details, format_project_list};
pub use report::{format_bar, format_bytes, format_money, format_percentage, separator, truncate};
