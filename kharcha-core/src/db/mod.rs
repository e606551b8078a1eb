//! Database layer for kharcha
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for inserts and queries
//! - A mutation counter so callers can invalidate cached snapshots

pub mod schema;
pub mod store;

pub use store::Database;
