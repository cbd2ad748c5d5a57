//! # Database Migrations
//!
//! The Compta schema, embedded at compile time from `migrations/sqlite/`.
//!
//! ## Schema
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  001_initial_schema.sql                                                 │
//! │                                                                         │
//! │  accounts                         operations                           │
//! │  ─────────                        ──────────                           │
//! │  id  (1-25 chars, PK)   ◄──────── account_id  ON DELETE CASCADE        │
//! │  label                            amount_cents        INTEGER          │
//! │  description                      vat_rate_bps        INTEGER          │
//! │                                   provision_rate_bps  INTEGER (4000)   │
//! │                                   debit_or_credit     CHECK (-1, 1)    │
//! │                                   operation_date / input_date  TEXT    │
//! │                                                                         │
//! │  idx_operations_account (account_id, operation_date)                   │
//! │    backs list_for_account() and operation_count()                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No derived amount has a column; gross, VAT and provision are recomputed
//! from these inputs on every read.
//!
//! New migrations get the next `NNN_description.sql` number. Applied files
//! are checksummed by sqlx and must not be edited.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every pending migration. Running it again is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!(
        embedded = MIGRATOR.migrations.len(),
        "Applying Compta schema migrations"
    );

    MIGRATOR.run(pool).await?;

    info!("Compta schema is up to date");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts.
///
/// A database that was never migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') \
             AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_schema_objects_exist() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(
            table_names(db.pool()).await,
            vec!["accounts", "idx_operations_account", "operations"]
        );
    }

    #[tokio::test]
    async fn test_unmigrated_database_reports_nothing_applied() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let (embedded, applied) = migration_status(db.pool()).await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(applied, 0);

        run_migrations(db.pool()).await.unwrap();
        run_migrations(db.pool()).await.unwrap();
        let (embedded, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_sign_column_only_accepts_debit_or_credit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO accounts (id, label) VALUES ('BANK', 'Bank')")
            .execute(db.pool())
            .await
            .unwrap();

        let insert = |sign: i64| {
            sqlx::query(
                "INSERT INTO operations (id, operation_date, input_date, label, \
                 debit_or_credit, account_id, amount_cents) \
                 VALUES (?1, '2024-01-05', '2024-01-05', 'x', ?2, 'BANK', 100)",
            )
            .bind(format!("op{sign}"))
            .bind(sign)
            .execute(db.pool())
        };

        assert!(insert(-1).await.is_ok());
        assert!(insert(1).await.is_ok());
        assert!(insert(0).await.is_err());
    }
}
