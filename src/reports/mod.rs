//! Reports module for Folio
//!
//! Aggregations over the two collections: finance summaries, category
//! breakdowns and monthly trends, plus project status/type/progress
//! statistics. Every report that depends on "now" has an `_at` variant
//! taking the reference date explicitly.

pub mod finance;
pub mod project;

pub use finance::{format_trend, monthly_totals, CategorySummary, FinanceSummary, MonthlyTotal};
pub use project::{
    MonthlyCreation, ProgressBucket, ProgressCount, ProjectReport, StatusCount, TypeCount,
};

use chrono::{Datelike, Local, Months, NaiveDate};

/// Length of the rolling trend window, in months
pub const TREND_MONTHS: u32 = 6;

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// First days of the `count` months ending with the month of `today`, oldest first
pub fn trailing_months(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let current = month_start(today);
    (0..count)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

/// Label such as `Jan 2024`
pub fn month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}

pub(crate) fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// `100 * part / whole`, or 0 when `whole` is not positive
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
