//! CSV batch import and export
//!
//! Import expects a header row with at least `date`, `description`, and
//! `amount` columns (matched case-insensitively, so exports from tools that
//! write `Date`/`Description`/`Amount` work unchanged). A `type` column is
//! optional and defaults to Debit; a `category` column, if present, is
//! ignored because the category is always recomputed from the description
//! at insert time.
//!
//! The whole batch is rejected if a required column is missing or any row
//! fails to parse - nothing is persisted on error.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{Expense, NewExpense, TxnType};
use chrono::NaiveDate;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Date formats accepted in import files
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    txn_type: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let mut missing = Vec::new();
        let date = find("date");
        let description = find("description");
        let amount = find("amount");
        for (col, name) in [(date, "date"), (description, "description"), (amount, "amount")] {
            if col.is_none() {
                missing.push(name);
            }
        }
        if !missing.is_empty() {
            return Err(Error::Import(format!(
                "CSV is missing required column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            date: date.unwrap(),
            description: description.unwrap(),
            amount: amount.unwrap(),
            txn_type: find("type"),
        })
    }
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    Err(Error::Import(format!(
        "row {}: unparseable date '{}' (expected YYYY-MM-DD or DD/MM/YYYY)",
        row, value
    )))
}

/// Parse expense rows from CSV.
///
/// Validates the header and every row; returns all rows or the first error.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<NewExpense>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let columns = Columns::resolve(rdr.headers()?)?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = record?;

        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let date = parse_date(field(columns.date), row)?;

        let amount: f64 = field(columns.amount).parse().map_err(|_| {
            Error::Import(format!(
                "row {}: unparseable amount '{}'",
                row,
                field(columns.amount)
            ))
        })?;

        // Missing or blank type column defaults to Debit; anything other
        // than Debit/Credit is an error, not free text
        let txn_type = match columns.txn_type.map(field).filter(|v| !v.is_empty()) {
            Some(value) => TxnType::from_str(value)
                .map_err(|e| Error::Import(format!("row {}: {}", row, e)))?,
            None => TxnType::Debit,
        };

        rows.push(NewExpense {
            date,
            description: field(columns.description).to_string(),
            amount,
            txn_type,
        });
    }

    Ok(rows)
}

/// Import a CSV file into the store as one atomic batch.
///
/// Returns the number of records inserted; on any error nothing is
/// persisted.
pub fn import_csv(db: &Database, path: &Path) -> Result<usize> {
    tracing::info!(path = %path.display(), "Importing CSV");
    let file = std::fs::File::open(path)?;
    let rows = read_csv(file)?;
    let inserted = db.bulk_insert(&rows)?;
    tracing::info!(inserted, "CSV import complete");
    Ok(inserted)
}

/// Write a full dump of the given expenses as CSV, header row included.
pub fn export_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "date", "description", "amount", "type", "category"])?;

    for e in expenses {
        wtr.write_record([
            e.id.to_string(),
            e.date.format("%Y-%m-%d").to_string(),
            e.description.clone(),
            format!("{:.2}", e.amount),
            e.txn_type.as_str().to_string(),
            e.category.as_str().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Dump the entire store to a CSV file.
pub fn export_csv_file(db: &Database, path: &Path) -> Result<usize> {
    let expenses = db.load_all()?;
    let file = std::fs::File::create(path)?;
    export_csv(&expenses, file)?;
    tracing::info!(path = %path.display(), rows = expenses.len(), "Exported CSV");
    Ok(expenses.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_read_minimal_columns() {
        let csv = "Date,Description,Amount\n2024-03-05,Zomato order,450.00\n";
        let rows = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Zomato order");
        assert_eq!(rows[0].amount, 450.0);
        // Missing type column defaults every row to Debit
        assert_eq!(rows[0].txn_type, TxnType::Debit);
    }

    #[test]
    fn test_read_with_type_column() {
        let csv = "date,description,amount,type\n\
                   2024-03-05,salary refund,1000,Credit\n\
                   2024-03-06,lunch,150,\n";
        let rows = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].txn_type, TxnType::Credit);
        // Blank type cell also defaults to Debit
        assert_eq!(rows[1].txn_type, TxnType::Debit);
    }

    #[test]
    fn test_missing_amount_column_rejected() {
        let csv = "Date,Description\n2024-03-05,Zomato order\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_unparseable_amount_rejected() {
        let csv = "date,description,amount\n2024-03-05,lunch,abc\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
    }

    #[test]
    fn test_unparseable_date_rejected() {
        let csv = "date,description,amount\n05 March 2024,lunch,100\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("unparseable date"));
    }

    #[test]
    fn test_invalid_type_rejected() {
        let csv = "date,description,amount,type\n2024-03-05,lunch,100,Transfer\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
    }

    #[test]
    fn test_slash_dates_accepted() {
        let csv = "date,description,amount\n05/03/2024,lunch,100\n";
        let rows = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(
            rows[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_supplied_category_column_is_ignored() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        // The batch claims "Medical" but the description says food
        let csv = "date,description,amount,category\n2024-03-05,zomato dinner,300,Medical\n";
        let rows = read_csv(csv.as_bytes()).unwrap();
        db.bulk_insert(&rows).unwrap();

        let all = db.load_all().unwrap();
        assert_eq!(all[0].category, Category::FoodDining);
    }

    #[test]
    fn test_export_shape() {
        let expenses = vec![Expense {
            id: 7,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            description: "Zomato order".to_string(),
            amount: 450.0,
            txn_type: TxnType::Debit,
            category: Category::FoodDining,
        }];

        let mut out = Vec::new();
        export_csv(&expenses, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,date,description,amount,type,category"
        );
        assert_eq!(
            lines.next().unwrap(),
            "7,2024-03-05,Zomato order,450.00,Debit,Food & Dining"
        );
    }
}
