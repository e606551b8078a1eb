//! Monthly category breakdowns
//!
//! Derived, consumer-facing aggregation over loaded expenses. Nothing here
//! is persisted; callers load records from the store and re-derive the
//! summaries whenever [`crate::db::Database::generation`] tells them their
//! snapshot is stale.

use crate::types::{Category, Expense, Period};
use std::collections::HashMap;

/// Per-period totals grouped by category.
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    /// The calendar year+month summarized
    pub period: Period,
    /// (category, summed amount), sorted descending by sum
    pub by_category: Vec<(Category, f64)>,
    /// Sum of all amounts in the period
    pub total: f64,
    /// Number of records in the period
    pub record_count: usize,
}

impl PeriodSummary {
    /// The category with the maximal sum, if the period has any records
    pub fn top(&self) -> Option<(Category, f64)> {
        self.by_category.first().copied()
    }
}

/// Distinct periods present in the data, newest first.
pub fn periods(expenses: &[Expense]) -> Vec<Period> {
    let mut periods: Vec<Period> = expenses
        .iter()
        .map(|e| e.period())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    periods.reverse();
    periods
}

/// Summarize one period: sum amounts grouped by category, sorted descending.
///
/// Ties are broken by the category's rule order so the output is
/// deterministic.
pub fn summarize(expenses: &[Expense], period: Period) -> PeriodSummary {
    let mut sums: HashMap<Category, f64> = HashMap::new();
    let mut total = 0.0;
    let mut record_count = 0;

    for e in expenses.iter().filter(|e| period.contains(e.date)) {
        *sums.entry(e.category).or_insert(0.0) += e.amount;
        total += e.amount;
        record_count += 1;
    }

    let mut by_category: Vec<(Category, f64)> = sums.into_iter().collect();
    by_category.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    PeriodSummary {
        period,
        by_category,
        total,
        record_count,
    }
}

/// One summary per period present in the data, newest first.
pub fn monthly_breakdown(expenses: &[Expense]) -> Vec<PeriodSummary> {
    periods(expenses)
        .into_iter()
        .map(|p| summarize(expenses, p))
        .collect()
}
