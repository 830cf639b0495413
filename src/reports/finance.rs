//! Finance reports
//!
//! Totals, per-category breakdowns and the monthly income/expense trend.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::display::{format_bar, format_money, format_percentage, separator};
use crate::models::{EntryType, FinanceEntry};

use super::{month_end, month_label, month_start, percentage, same_month, today, trailing_months};

/// Overall and current-month totals
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_balance: f64,
}

impl FinanceSummary {
    /// Summary relative to the current local date
    pub fn calculate(entries: &[FinanceEntry]) -> Self {
        Self::calculate_at(entries, today())
    }

    /// Summary whose monthly figures cover the calendar month of `today`
    pub fn calculate_at(entries: &[FinanceEntry], today: NaiveDate) -> Self {
        let (first, last) = (month_start(today), month_end(today));
        let mut summary = Self::default();

        for entry in entries {
            let this_month = entry.date >= first && entry.date <= last;
            match entry.entry_type {
                EntryType::Income => {
                    summary.total_income += entry.amount;
                    if this_month {
                        summary.monthly_income += entry.amount;
                    }
                }
                EntryType::Expense => {
                    summary.total_expenses += entry.amount;
                    if this_month {
                        summary.monthly_expenses += entry.amount;
                    }
                }
            }
        }

        summary.balance = summary.total_income - summary.total_expenses;
        summary.monthly_balance = summary.monthly_income - summary.monthly_expenses;
        summary
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("{:<18} {:>18} {:>18}\n", "", "All time", "This month"));
        output.push_str(&separator(56));
        output.push('\n');

        let rows = [
            ("Income", self.total_income, self.monthly_income),
            ("Expenses", self.total_expenses, self.monthly_expenses),
            ("Balance", self.balance, self.monthly_balance),
        ];
        for (label, total, monthly) in rows {
            output.push_str(&format!(
                "{:<18} {:>18} {:>18}\n",
                label,
                format_money(total, currency),
                format_money(monthly, currency)
            ));
        }
        output
    }
}

/// Aggregate of one category within one entry type
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub amount: f64,
    pub count: usize,
    /// Share of the total for the requested type
    pub percentage: f64,
}

impl CategorySummary {
    /// Per-category totals for `entry_type`, largest amount first
    ///
    /// Percentages are taken against the total of the requested type only,
    /// so they sum to 100 whenever that total is positive.
    pub fn for_type(entries: &[FinanceEntry], entry_type: EntryType) -> Vec<Self> {
        let mut order: Vec<Self> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut total = 0.0;

        for entry in entries.iter().filter(|e| e.entry_type == entry_type) {
            total += entry.amount;
            let slot = *index.entry(entry.category.as_str()).or_insert_with(|| {
                order.push(Self {
                    category: entry.category.clone(),
                    amount: 0.0,
                    count: 0,
                    percentage: 0.0,
                });
                order.len() - 1
            });
            order[slot].amount += entry.amount;
            order[slot].count += 1;
        }

        for summary in &mut order {
            summary.percentage = percentage(summary.amount, total);
        }
        order.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        order
    }

    /// Format a breakdown for terminal display
    pub fn format_terminal(summaries: &[Self], entry_type: EntryType, currency: &str) -> String {
        let mut output = String::new();
        let title = match entry_type {
            EntryType::Income => "Income by category",
            EntryType::Expense => "Expenses by category",
        };
        output.push_str(title);
        output.push('\n');
        output.push_str(&separator(72));
        output.push('\n');

        if summaries.is_empty() {
            output.push_str("No entries\n");
            return output;
        }

        let max = summaries.iter().map(|s| s.amount).fold(0.0, f64::max);
        for summary in summaries {
            output.push_str(&format!(
                "{:<22} {:>16} {:>5} {:>7} {}\n",
                summary.category,
                format_money(summary.amount, currency),
                summary.count,
                format_percentage(summary.percentage),
                format_bar(summary.amount, max, 16)
            ));
        }
        output
    }
}

/// Income and expenses within one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    /// First day of the month
    pub month: NaiveDate,
    /// e.g. `Jan 2024`
    pub label: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Monthly totals for the `months` months ending with the month of `today`
pub fn monthly_totals(entries: &[FinanceEntry], today: NaiveDate, months: u32) -> Vec<MonthlyTotal> {
    trailing_months(today, months)
        .into_iter()
        .map(|month| {
            let (mut income, mut expenses) = (0.0, 0.0);
            for entry in entries.iter().filter(|e| same_month(e.date, month)) {
                match entry.entry_type {
                    EntryType::Income => income += entry.amount,
                    EntryType::Expense => expenses += entry.amount,
                }
            }
            MonthlyTotal {
                month,
                label: month_label(month),
                income,
                expenses,
                balance: income - expenses,
            }
        })
        .collect()
}

/// Format a monthly trend as a table
pub fn format_trend(totals: &[MonthlyTotal], currency: &str) -> String {
    let mut output = String::new();
    output.push_str("Monthly Trend\n");
    output.push_str(&separator(72));
    output.push('\n');
    output.push_str(&format!(
        "{:<10} {:>18} {:>18} {:>18}\n",
        "Month", "Income", "Expenses", "Balance"
    ));
    for total in totals {
        output.push_str(&format!(
            "{:<10} {:>18} {:>18} {:>18}\n",
            total.label,
            format_money(total.income, currency),
            format_money(total.expenses, currency),
            format_money(total.balance, currency)
        ));
    }
    output
}
