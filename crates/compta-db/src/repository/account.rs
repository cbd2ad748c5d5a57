//! # Account Repository
//!
//! Database operations for accounts.
//!
//! Accounts carry a caller-chosen business id (e.g. `"BANK-01"`) instead of
//! a generated UUID. Deleting an account deletes its operations through the
//! `ON DELETE CASCADE` foreign key.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use compta_core::Account;

/// Row shape of the `accounts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct AccountRow {
    id: String,
    label: String,
    description: String,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            label: row.label,
            description: row.description,
        }
    }
}

/// Repository for account database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.accounts();
/// repo.insert(&Account::new("BANK", "Main bank", "")).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Inserts a new account after validating it.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - a field rule failed
    /// * `Err(DbError::UniqueViolation)` - the id is taken
    pub async fn insert(&self, account: &Account) -> DbResult<Account> {
        account.validate()?;

        debug!(id = %account.id, "Inserting account");

        sqlx::query("INSERT INTO accounts (id, label, description) VALUES (?1, ?2, ?3)")
            .bind(&account.id)
            .bind(&account.label)
            .bind(&account.description)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                    field,
                    value: account.id.clone(),
                },
                other => other,
            })?;

        Ok(account.clone())
    }

    /// Gets an account by its id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, label, description FROM accounts WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from))
    }

    /// Whether an account with this id exists.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM accounts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Lists every account, ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, label, description FROM accounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed accounts");
        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Updates label and description of an existing account.
    pub async fn update(&self, account: &Account) -> DbResult<()> {
        account.validate()?;

        debug!(id = %account.id, "Updating account");

        let result = sqlx::query("UPDATE accounts SET label = ?2, description = ?3 WHERE id = ?1")
            .bind(&account.id)
            .bind(&account.label)
            .bind(&account.description)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Account", &account.id));
        }

        Ok(())
    }

    /// Deletes an account and, by cascade, all of its operations.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting account");

        let result = sqlx::query("DELETE FROM accounts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Account", id));
        }

        Ok(())
    }

    /// Counts accounts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let repo = db.accounts();

        repo.insert(&Account::new("BANK", "Main bank", "Checking"))
            .await
            .unwrap();

        let found = repo.get_by_id("BANK").await.unwrap().unwrap();
        assert_eq!(found.label, "Main bank");
        assert_eq!(found.description, "Checking");
        assert!(repo.exists("BANK").await.unwrap());
        assert!(repo.get_by_id("NOPE").await.unwrap().is_none());
        assert!(!repo.exists("NOPE").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let db = db().await;
        let repo = db.accounts();

        repo.insert(&Account::new("BANK", "Main bank", "")).await.unwrap();
        let err = repo
            .insert(&Account::new("BANK", "Other", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "BANK"));
    }

    #[tokio::test]
    async fn test_invalid_account_never_reaches_sql() {
        let db = db().await;
        let err = db
            .accounts()
            .insert(&Account::new("", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.accounts().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let db = db().await;
        let repo = db.accounts();
        for id in ["SAVINGS", "BANK", "CASH"] {
            repo.insert(&Account::new(id, id.to_lowercase(), "")).await.unwrap();
        }

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["BANK", "CASH", "SAVINGS"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = db().await;
        let repo = db.accounts();
        repo.insert(&Account::new("BANK", "Main bank", "")).await.unwrap();

        repo.update(&Account::new("BANK", "Renamed", "now described"))
            .await
            .unwrap();
        let found = repo.get_by_id("BANK").await.unwrap().unwrap();
        assert_eq!(found.label, "Renamed");

        assert!(matches!(
            repo.update(&Account::new("GHOST", "x", "")).await,
            Err(DbError::NotFound { .. })
        ));

        repo.delete("BANK").await.unwrap();
        assert!(repo.get_by_id("BANK").await.unwrap().is_none());
        assert!(matches!(repo.delete("BANK").await, Err(DbError::NotFound { .. })));
    }
}
