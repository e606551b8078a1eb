//! Core domain types for kharcha
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Expense** | One persisted record: date, description, amount, type, category |
//! | **Category** | One of the ten fixed spending labels, always derived from the description |
//! | **Period** | A calendar year+month used as the grouping key for summaries |
//!
//! Records are immutable once stored: there is no update operation, and the
//! only deletion is a whole-table clear. The category is assigned at insert
//! time by [`crate::categorize::categorize`] and never user-editable.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================
// Category
// ============================================

/// The fixed set of spending categories.
///
/// Every expense carries exactly one of these labels. The set is closed:
/// users cannot add categories, and anything the rule table does not
/// recognize falls into [`Category::Others`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Medical,
    Groceries,
    #[serde(rename = "Subscriptions & Books")]
    SubscriptionsBooks,
    Transportation,
    #[serde(rename = "Food & Dining")]
    FoodDining,
    Fuel,
    Rent,
    #[serde(rename = "Mobile Recharge")]
    MobileRecharge,
    Clothing,
    Others,
}

impl Category {
    /// All categories, in rule-precedence order (Others last).
    pub const ALL: [Category; 10] = [
        Category::Medical,
        Category::Groceries,
        Category::SubscriptionsBooks,
        Category::Transportation,
        Category::FoodDining,
        Category::Fuel,
        Category::Rent,
        Category::MobileRecharge,
        Category::Clothing,
        Category::Others,
    ];

    /// Returns the label used in database storage and CSV export
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medical => "Medical",
            Category::Groceries => "Groceries",
            Category::SubscriptionsBooks => "Subscriptions & Books",
            Category::Transportation => "Transportation",
            Category::FoodDining => "Food & Dining",
            Category::Fuel => "Fuel",
            Category::Rent => "Rent",
            Category::MobileRecharge => "Mobile Recharge",
            Category::Clothing => "Clothing",
            Category::Others => "Others",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Medical" => Ok(Category::Medical),
            "Groceries" => Ok(Category::Groceries),
            "Subscriptions & Books" => Ok(Category::SubscriptionsBooks),
            "Transportation" => Ok(Category::Transportation),
            "Food & Dining" => Ok(Category::FoodDining),
            "Fuel" => Ok(Category::Fuel),
            "Rent" => Ok(Category::Rent),
            "Mobile Recharge" => Ok(Category::MobileRecharge),
            "Clothing" => Ok(Category::Clothing),
            "Others" => Ok(Category::Others),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

// ============================================
// Transaction type
// ============================================

/// Whether an expense debits or credits the account.
///
/// These are the only two legal values. Batch sources that carry anything
/// else are rejected rather than stored as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxnType {
    Debit,
    Credit,
}

impl TxnType {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Debit => "Debit",
            TxnType::Credit => "Credit",
        }
    }
}

impl Default for TxnType {
    fn default() -> Self {
        TxnType::Debit
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TxnType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Debit" | "debit" => Ok(TxnType::Debit),
            "Credit" | "credit" => Ok(TxnType::Credit),
            _ => Err(format!("unknown transaction type: {}", s)),
        }
    }
}

// ============================================
// Expenses
// ============================================

/// An expense that has not been persisted yet.
///
/// The category is intentionally absent: it is derived from the description
/// at insert time and never trusted from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    /// Calendar date of the expense (no time component)
    pub date: NaiveDate,
    /// Free-form user-supplied text; must be non-empty after trimming
    pub description: String,
    /// Positive amount, currency-agnostic
    pub amount: f64,
    /// Debit or Credit
    pub txn_type: TxnType,
}

impl NewExpense {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            txn_type: TxnType::Debit,
        }
    }

    /// Check the record invariants: non-empty description, amount > 0.
    ///
    /// The store calls this again before writing, so invalid rows can never
    /// reach durable storage even if a caller skips validation.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::Validation("description cannot be empty".to_string()));
        }
        if !(self.amount > 0.0) {
            return Err(Error::Validation(format!(
                "amount must be greater than zero, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// A persisted expense record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique id assigned by the store on insert, never reused
    pub id: i64,
    /// Calendar date of the expense
    pub date: NaiveDate,
    /// Free-form description
    pub description: String,
    /// Positive amount
    pub amount: f64,
    /// Debit or Credit
    pub txn_type: TxnType,
    /// Derived spending category
    pub category: Category,
}

impl Expense {
    /// The period this expense falls into
    pub fn period(&self) -> Period {
        Period::from_date(self.date)
    }
}

// ============================================
// Period
// ============================================

/// A calendar year+month, the grouping key for monthly summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Check whether a date falls inside this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in period: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in period: {}", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in period: {}", s));
        }
        Ok(Period { year, month })
    }
}
