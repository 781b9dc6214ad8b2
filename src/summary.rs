//! Pure aggregation functions over a slice of expense records.
//!
//! Every view that reports on spending (dashboard, analytics page, CLI
//! overview, HTML report, JSON stats API) goes through these functions so
//! the numbers agree everywhere.

use std::collections::HashMap;

use time::{Date, Month};

use crate::expense::{CategoryName, Expense};

/// The total amount spent across all `expenses`.
pub fn total_spending(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Total spending per category.
pub fn category_totals(expenses: &[Expense]) -> HashMap<CategoryName, f64> {
    let mut totals = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }

    totals
}

/// The total amount spent in one calendar month.
///
/// A month with no expenses totals `0`.
pub fn monthly_total(expenses: &[Expense], year: i32, month: Month) -> f64 {
    expenses
        .iter()
        .filter(|expense| expense.date.year() == year && expense.date.month() == month)
        .map(|expense| expense.amount)
        .sum()
}

/// One row of the per-category spending breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    /// The category the row describes.
    pub category: CategoryName,
    /// Total spending in the category.
    pub total: f64,
    /// The category's share of all spending, as a percentage. Defined as `0`
    /// when there is no spending at all.
    pub percentage: f64,
}

/// Per-category totals with their percentage of all spending, sorted by
/// total descending (ties broken by name).
pub fn category_percentages(expenses: &[Expense]) -> Vec<CategoryBreakdown> {
    let total = total_spending(expenses);

    let mut breakdown: Vec<CategoryBreakdown> = category_totals(expenses)
        .into_iter()
        .map(|(category, category_total)| CategoryBreakdown {
            category,
            total: category_total,
            percentage: if total > 0.0 {
                category_total / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    breakdown
}

/// The headline statistics shared by the dashboard, the CLI overview, and
/// the HTML report.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingSummary {
    /// How many expenses are recorded.
    pub count: usize,
    /// The total amount spent.
    pub total: f64,
    /// The mean expense amount, or `0` when there are no expenses.
    pub average: f64,
    /// The date of the oldest expense, if any.
    pub earliest: Option<Date>,
    /// The date of the newest expense, if any.
    pub latest: Option<Date>,
}

/// Compute the headline statistics for `expenses`.
pub fn spending_summary(expenses: &[Expense]) -> SpendingSummary {
    let count = expenses.len();
    let total = total_spending(expenses);
    let average = if count > 0 { total / count as f64 } else { 0.0 };

    SpendingSummary {
        count,
        total,
        average,
        earliest: expenses.iter().map(|expense| expense.date).min(),
        latest: expenses.iter().map(|expense| expense.date).max(),
    }
}
