//! # Seed Data Generator
//!
//! Populates the database with sample accounts and operations for
//! development, then prints every operation with its derived amounts.
//!
//! ## Usage
//! ```bash
//! # Generate 24 operations (default)
//! cargo run -p compta-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p compta-db --bin seed -- --count 100
//!
//! # Specify database path (COMPTA_DB_PATH also works)
//! cargo run -p compta-db --bin seed -- --db ./data/compta.db
//! ```
//!
//! ## Generated Operations
//! Operations cycle through the sample accounts, both directions, tax
//! included and excluded, and a handful of VAT rates. New operations take
//! their toggles and rates from `COMPTA_DEFAULT_*` where set.

use chrono::{Days, NaiveDate};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use compta_core::{Account, DebitOrCredit, Money, Operation, OperationDefaults, Rate};
use compta_db::{Database, DbConfig};

/// Sample accounts: (id, label, description)
const ACCOUNTS: &[(&str, &str, &str)] = &[
    ("BANK-01", "Main bank", "Business checking account"),
    ("CASH", "Cash box", "Petty cash"),
    ("SAVINGS", "Savings", ""),
];

/// Sample labels with their direction
const LABELS: &[(&str, DebitOrCredit)] = &[
    ("Customer invoice", DebitOrCredit::Credit),
    ("Office rent", DebitOrCredit::Debit),
    ("Consulting fee", DebitOrCredit::Credit),
    ("Supplies", DebitOrCredit::Debit),
    ("Software licence", DebitOrCredit::Debit),
    ("Training session", DebitOrCredit::Credit),
];

/// VAT rates in basis points
const VAT_RATES: &[i64] = &[2000, 1000, 550, 210];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 24;
    let mut db_path = String::from("./compta_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(24);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Compta Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of operations to generate (default: 24)");
                println!("  -d, --db <PATH>    Database file path (default: ./compta_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = DbConfig::from_env(&db_path);
    let defaults = OperationDefaults::from_lookup(|key| env::var(key).ok())?;

    println!("Compta Seed Data Generator");
    println!("==========================");
    println!("Database:   {}", config.database_path.display());
    println!("Operations: {}", count);
    println!();

    let db = Database::new(config).await?;
    info!("Connected, migrations applied");

    let existing = db.operations().count().await?;
    if existing > 0 {
        println!("Database already has {} operations", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        seed(&db, defaults, count).await?;
    }

    report(&db).await?;

    db.close().await;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,compta=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn seed(
    db: &Database,
    defaults: OperationDefaults,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    for (id, label, description) in ACCOUNTS {
        if !db.accounts().exists(id).await? {
            db.accounts()
                .insert(&Account::new(*id, *label, *description))
                .await?;
        }
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let operation = generate_operation(defaults, seed);
        match db.operations().insert(operation).await {
            Ok(_) => generated += 1,
            Err(e) => warn!(seed, error = %e, "Failed to insert operation"),
        }
    }

    info!(generated, elapsed = ?start.elapsed(), "Seed complete");
    Ok(())
}

/// Generates a single operation from `seed`.
fn generate_operation(defaults: OperationDefaults, seed: usize) -> Operation {
    let (account_id, _, _) = ACCOUNTS[seed % ACCOUNTS.len()];
    let (label, direction) = LABELS[seed % LABELS.len()];

    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let date = base
        .checked_add_days(Days::new((seed * 3) as u64))
        .unwrap_or(base);

    // 10.00 - 2509.99
    let cents = 1_000 + ((seed * 7_919) % 250_000) as i64;

    let mut operation = Operation::with_defaults(
        defaults,
        account_id,
        date,
        label,
        direction,
        Money::from_cents(cents),
    );

    if defaults.vat_rate.is_zero() {
        operation = operation.vat(defaults.apply_vat, Rate::from_bps(VAT_RATES[seed % VAT_RATES.len()]));
    }
    if seed % 4 == 3 {
        operation = operation.tax_included(false);
    }
    if seed % 5 == 4 {
        operation = operation.provision(false, defaults.provision_rate);
    }

    operation
}

async fn report(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let accounts = db.accounts().list().await?;

    for account in &accounts {
        let operations = db.operations().list_for_account(&account.id).await?;
        let mut balance = Money::zero();

        println!();
        println!("{} ({})", account, account.id);

        for op in &operations {
            println!("  {}", op.describe(account));
            match op.calculator() {
                Ok(calc) => {
                    let amounts = calc.amounts();
                    balance += amounts.signed_gross();
                    println!(
                        "    gross {:>10}  vat {:>9}  net {:>10}  provision {:>9}  signed {:>11}",
                        amounts.gross,
                        amounts.vat,
                        amounts.net,
                        amounts.provision,
                        amounts.signed_gross()
                    );
                }
                Err(e) => warn!(id = %op.id, error = %e, "Cannot derive amounts"),
            }
        }

        let count = db.operations().operation_count(&account.id).await?;
        println!("  {} operations, balance {}", count, balance);
    }

    Ok(())
}
