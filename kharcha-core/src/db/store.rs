//! Expense store
//!
//! Repository over the SQLite `expenses` table. Every mutating operation
//! runs inside a transaction so that concurrent readers (including other
//! processes sharing the database file) never observe a partially applied
//! batch. Records are immutable once stored: there is no update and no
//! per-record delete, only the whole-table [`Database::clear_all`].

use crate::categorize::categorize;
use crate::error::{Error, Result};
use crate::types::{Category, Expense, NewExpense, TxnType};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Date storage format in the `expenses` table
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database handle owning a single connection.
pub struct Database {
    conn: Mutex<Connection>,
    /// Bumped on every successful mutation; see [`Database::generation`]
    generation: AtomicU64,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for crash recovery and concurrent readers
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            generation: AtomicU64::new(0),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
            generation: AtomicU64::new(0),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Mutation counter for cache invalidation.
    ///
    /// Incremented by every successful `insert`, `bulk_insert`, and
    /// `clear_all`. A caller holding a cached `load_all()` snapshot can
    /// compare generations to detect staleness instead of re-reading the
    /// table on every interaction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    // ============================================
    // Mutations
    // ============================================

    /// Insert one expense, deriving its category from the description.
    ///
    /// Validates the record before touching storage, so invalid rows never
    /// reach the table. Returns the stored record with its fresh id.
    pub fn insert(&self, new: &NewExpense) -> Result<Expense> {
        new.validate()?;
        let category = categorize(&new.description);
        let description = new.description.trim().to_string();

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO expenses (date, description, amount, txn_type, category)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.date.format(DATE_FORMAT).to_string(),
                description,
                new.amount,
                new.txn_type.as_str(),
                category.as_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        drop(conn);

        self.bump_generation();
        tracing::debug!(id, category = %category, "Inserted expense");

        Ok(Expense {
            id,
            date: new.date,
            description,
            amount: new.amount,
            txn_type: new.txn_type,
            category,
        })
    }

    /// Insert a batch of expenses as a single atomic operation.
    ///
    /// Every row is validated before any write; categories are always
    /// recomputed from the descriptions. If any row fails validation or any
    /// insert fails, the transaction rolls back and nothing is persisted.
    /// Returns the number of rows inserted.
    pub fn bulk_insert(&self, rows: &[NewExpense]) -> Result<usize> {
        for (i, row) in rows.iter().enumerate() {
            row.validate()
                .map_err(|e| Error::Import(format!("row {}: {}", i + 1, e)))?;
        }

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO expenses (date, description, amount, txn_type, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.date.format(DATE_FORMAT).to_string(),
                    row.description.trim(),
                    row.amount,
                    row.txn_type.as_str(),
                    categorize(&row.description).as_str(),
                ])?;
            }
        }
        tx.commit()?;
        drop(conn);

        if !rows.is_empty() {
            self.bump_generation();
        }
        tracing::info!(count = rows.len(), "Bulk inserted expenses");

        Ok(rows.len())
    }

    /// Delete every record, irreversibly. The schema survives and accepts
    /// subsequent inserts. Returns the number of rows deleted.
    pub fn clear_all(&self) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM expenses", [])?;
        tx.commit()?;
        drop(conn);

        self.bump_generation();
        tracing::info!(deleted, "Cleared expense table");

        Ok(deleted)
    }

    // ============================================
    // Queries
    // ============================================

    /// Load every expense, ordered by date then id.
    ///
    /// An absent or empty table yields an empty Vec, never an error.
    pub fn load_all(&self) -> Result<Vec<Expense>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, date, description, amount, txn_type, category
             FROM expenses
             ORDER BY date, id",
        )?;

        let expenses = stmt
            .query_map([], Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Number of stored expenses
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))?;
        Ok(count)
    }

    fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
        let date_str: String = row.get("date")?;
        let txn_type_str: String = row.get("txn_type")?;
        let category_str: String = row.get("category")?;

        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;

        Ok(Expense {
            id: row.get("id")?,
            date,
            description: row.get("description")?,
            amount: row.get("amount")?,
            txn_type: TxnType::from_str(&txn_type_str).unwrap_or_default(),
            category: Category::from_str(&category_str).unwrap_or(Category::Others),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_insert_derives_category() {
        let db = test_db();
        let stored = db
            .insert(&NewExpense::new(date(2024, 3, 5), "Zomato order", 450.0))
            .unwrap();

        assert_eq!(stored.category, Category::FoodDining);
        assert!(stored.id > 0);

        let all = db.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "Zomato order");
    }

    #[test]
    fn test_insert_rejects_invalid_rows() {
        let db = test_db();

        let blank = NewExpense::new(date(2024, 3, 5), "  ", 100.0);
        assert!(matches!(db.insert(&blank), Err(Error::Validation(_))));

        let negative = NewExpense::new(date(2024, 3, 5), "Lunch", -5.0);
        assert!(matches!(db.insert(&negative), Err(Error::Validation(_))));

        // Nothing reached the table
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn test_identical_inserts_get_distinct_ids() {
        let db = test_db();
        let new = NewExpense::new(date(2024, 3, 5), "chai snack", 20.0);

        let a = db.insert(&new).unwrap();
        let b = db.insert(&new).unwrap();
        let c = db.insert(&new).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_eq!(db.count().unwrap(), 3);
    }

    #[test]
    fn test_load_all_empty_store() {
        let db = test_db();
        let all = db.load_all().unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_load_all_sorted_by_date() {
        let db = test_db();
        db.insert(&NewExpense::new(date(2024, 3, 10), "dinner", 300.0))
            .unwrap();
        db.insert(&NewExpense::new(date(2024, 2, 1), "petrol", 900.0))
            .unwrap();
        db.insert(&NewExpense::new(date(2024, 3, 5), "uber", 150.0))
            .unwrap();

        let all = db.load_all().unwrap();
        let dates: Vec<_> = all.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 2, 1), date(2024, 3, 5), date(2024, 3, 10)]
        );
    }

    #[test]
    fn test_bulk_insert_is_atomic() {
        let db = test_db();
        let rows = vec![
            NewExpense::new(date(2024, 3, 5), "lunch", 120.0),
            NewExpense::new(date(2024, 3, 6), "uber", 80.0),
            // Invalid row: whole batch must be rejected
            NewExpense::new(date(2024, 3, 7), "petrol", -1.0),
        ];

        let err = db.bulk_insert(&rows).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
        assert_eq!(db.count().unwrap(), 0, "no row of the batch may persist");
    }

    #[test]
    fn test_bulk_insert_recomputes_categories() {
        let db = test_db();
        let rows = vec![
            NewExpense::new(date(2024, 3, 5), "netflix", 199.0),
            NewExpense::new(date(2024, 3, 6), "auto fare", 40.0),
        ];

        assert_eq!(db.bulk_insert(&rows).unwrap(), 2);

        let all = db.load_all().unwrap();
        assert_eq!(all[0].category, Category::SubscriptionsBooks);
        assert_eq!(all[1].category, Category::Transportation);
    }

    #[test]
    fn test_clear_all_keeps_schema() {
        let db = test_db();
        db.insert(&NewExpense::new(date(2024, 3, 5), "lunch", 120.0))
            .unwrap();
        db.insert(&NewExpense::new(date(2024, 3, 6), "uber", 80.0))
            .unwrap();

        assert_eq!(db.clear_all().unwrap(), 2);
        assert!(db.load_all().unwrap().is_empty());

        // Table still accepts inserts after a clear
        db.insert(&NewExpense::new(date(2024, 4, 1), "rent", 15000.0))
            .unwrap();
        assert_eq!(db.count().unwrap(), 1);
    }

    #[test]
    fn test_generation_bumps_on_mutations() {
        let db = test_db();
        let g0 = db.generation();

        db.insert(&NewExpense::new(date(2024, 3, 5), "lunch", 120.0))
            .unwrap();
        let g1 = db.generation();
        assert!(g1 > g0);

        db.bulk_insert(&[NewExpense::new(date(2024, 3, 6), "uber", 80.0)])
            .unwrap();
        let g2 = db.generation();
        assert!(g2 > g1);

        db.clear_all().unwrap();
        assert!(db.generation() > g2);

        // Reads do not bump
        let g3 = db.generation();
        db.load_all().unwrap();
        assert_eq!(db.generation(), g3);
    }

    #[test]
    fn test_generation_unchanged_on_failed_mutation() {
        let db = test_db();
        let g0 = db.generation();

        let bad = NewExpense::new(date(2024, 3, 5), "", 10.0);
        assert!(db.insert(&bad).is_err());
        assert_eq!(db.generation(), g0);
    }
}
