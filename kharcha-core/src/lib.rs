//! # kharcha-core
//!
//! Core library for kharcha - a personal expense categorizer and tracker.
//!
//! This library provides:
//! - Domain types for expenses, categories, and periods
//! - A rule-based categorizer mapping descriptions to spending categories
//! - A durable SQLite expense store
//! - CSV batch import/export
//! - Monthly category summaries
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! A description flows through a fixed pipeline: the categorizer assigns a
//! [`Category`], the [`Database`] persists the record, and callers reload
//! and derive monthly breakdowns via [`report`]. The store is the single
//! source of truth; summaries are never persisted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kharcha_core::{Config, Database};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//! ```

// Re-export commonly used items at the crate root
pub use categorize::categorize;
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::{Category, Expense, NewExpense, Period, TxnType};

// Public modules
pub mod categorize;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod report;
pub mod types;
