//! kharcha - personal expense categorizer and tracker
//!
//! Thin CLI front-end over kharcha-core: logs expenses, ingests CSV
//! batches, and prints monthly category breakdowns.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/kharcha/expenses.db (~/.local/share/kharcha/expenses.db)
//! - Logs: $XDG_STATE_HOME/kharcha/kharcha.log (~/.local/state/kharcha/kharcha.log)
//! - Config: $XDG_CONFIG_HOME/kharcha/config.toml (~/.config/kharcha/config.toml)

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use kharcha_core::ingest::{export_csv_file, import_csv};
use kharcha_core::{report, Config, Database, NewExpense, Period, TxnType};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "kharcha")]
#[command(about = "Personal expense categorizer and tracker")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a single expense; the category is derived from the description
    Add {
        /// Expense description, e.g. "Zomato order"
        description: String,

        /// Amount, must be greater than zero
        amount: f64,

        /// Calendar date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Debit or Credit
        #[arg(short = 't', long = "type", default_value = "Debit")]
        txn_type: String,
    },

    /// Import a CSV batch (columns: date, description, amount[, type])
    Import {
        /// Path to the CSV file
        path: PathBuf,
    },

    /// Export the full store as CSV
    Export {
        /// Output file path
        path: PathBuf,
    },

    /// List stored expenses, optionally for one month
    List {
        /// Restrict to a month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show category totals per month
    Report {
        /// Restrict to a month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete every stored expense
    Clear {
        /// Confirm the irreversible deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        kharcha_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("kharcha starting");

    // Open database
    let db_path = config.database_path();
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    match args.command {
        Command::Add {
            description,
            amount,
            date,
            txn_type,
        } => {
            let txn_type = TxnType::from_str(&txn_type)
                .map_err(|e| anyhow::anyhow!(e))
                .context("type must be Debit or Credit")?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            let stored = db
                .insert(&NewExpense {
                    date,
                    description,
                    amount,
                    txn_type,
                })
                .context("failed to add expense")?;

            println!(
                "Added expense #{}: {} on {} ({}, {:.2})",
                stored.id, stored.description, stored.date, stored.category, stored.amount
            );
        }

        Command::Import { path } => {
            let inserted = import_csv(&db, &path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            println!("Imported {} expense(s) from {}", inserted, path.display());
        }

        Command::Export { path } => {
            let exported = export_csv_file(&db, &path)
                .with_context(|| format!("failed to export to {}", path.display()))?;
            println!("Exported {} expense(s) to {}", exported, path.display());
        }

        Command::List { month } => {
            let mut expenses = db.load_all().context("failed to load expenses")?;
            if let Some(month) = month {
                let period = parse_period(&month)?;
                expenses.retain(|e| period.contains(e.date));
            }

            if expenses.is_empty() {
                println!("No expenses found.");
            } else {
                println!(
                    "{:>5}  {:<10}  {:<30}  {:>10}  {:<6}  {}",
                    "id", "date", "description", "amount", "type", "category"
                );
                for e in &expenses {
                    println!(
                        "{:>5}  {:<10}  {:<30}  {:>10.2}  {:<6}  {}",
                        e.id, e.date, e.description, e.amount, e.txn_type, e.category
                    );
                }
                println!("{} expense(s)", expenses.len());
            }
        }

        Command::Report { month } => {
            let expenses = db.load_all().context("failed to load expenses")?;

            let summaries = match month {
                Some(month) => vec![report::summarize(&expenses, parse_period(&month)?)],
                None => report::monthly_breakdown(&expenses),
            };

            if summaries.iter().all(|s| s.record_count == 0) {
                println!("No expenses found.");
            }
            for summary in summaries.iter().filter(|s| s.record_count > 0) {
                println!("{} ({} expense(s))", summary.period, summary.record_count);
                for (category, sum) in &summary.by_category {
                    println!("  {:<22} {:>12.2}", category.as_str(), sum);
                }
                if let Some((top, sum)) = summary.top() {
                    println!("  Highest spending: {} ({:.2})", top, sum);
                }
                println!("  {:<22} {:>12.2}", "Total", summary.total);
            }
        }

        Command::Clear { yes } => {
            if !yes {
                bail!("refusing to clear without --yes; this deletes every expense");
            }
            let deleted = db.clear_all().context("failed to clear expenses")?;
            println!("Deleted {} expense(s)", deleted);
        }
    }

    Ok(())
}

fn parse_period(s: &str) -> Result<Period> {
    Period::from_str(s).map_err(|e| anyhow::anyhow!("invalid --month: {}", e))
}
