//! # Operation Repository
//!
//! Database operations for debit/credit operations.
//!
//! ## What Gets Stored
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stored vs Derived                                    │
//! │                                                                         │
//! │  STORED (operations table)          DERIVED (never stored)             │
//! │  ─────────────────────────          ──────────────────────             │
//! │  amount_cents                       gross amount                       │
//! │  all_tax_included                   VAT amount                         │
//! │  apply_vat, vat_rate_bps      ──►   net amount                         │
//! │  apply_provision,                   provision amount                   │
//! │    provision_rate_bps                                                   │
//! │  debit_or_credit (-1 / 1)                                              │
//! │                                                                         │
//! │  insert/update run Operation::clean() first, so a disabled toggle      │
//! │  is always stored with a 0.00 rate and amount is always > 0.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use compta_core::{CoreResult, DebitOrCredit, Money, Operation, Rate};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, operation_date, input_date, label, debit_or_credit, account_id,
        amount_cents, all_tax_included, apply_vat, vat_rate_bps,
        apply_provision, provision_rate_bps, comment
    FROM operations
"#;

/// Row shape of the `operations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct OperationRow {
    id: String,
    operation_date: NaiveDate,
    input_date: NaiveDate,
    label: String,
    debit_or_credit: i64,
    account_id: String,
    amount_cents: i64,
    all_tax_included: bool,
    apply_vat: bool,
    vat_rate_bps: i64,
    apply_provision: bool,
    provision_rate_bps: i64,
    comment: String,
}

impl OperationRow {
    fn into_operation(self) -> CoreResult<Operation> {
        Ok(Operation {
            debit_or_credit: DebitOrCredit::from_code(self.debit_or_credit)?,
            id: self.id,
            operation_date: self.operation_date,
            input_date: self.input_date,
            label: self.label,
            account_id: self.account_id,
            amount: Money::from_cents(self.amount_cents),
            all_tax_included: self.all_tax_included,
            apply_vat: self.apply_vat,
            vat_rate: Rate::from_bps(self.vat_rate_bps),
            apply_provision: self.apply_provision,
            provision_rate: Rate::from_bps(self.provision_rate_bps),
            comment: self.comment,
        })
    }
}

fn decode(row: OperationRow) -> DbResult<Operation> {
    let id = row.id.clone();
    row.into_operation()
        .map_err(|e| DbError::corrupt("Operation", id, e))
}

fn decode_all(rows: Vec<OperationRow>) -> DbResult<Vec<Operation>> {
    rows.into_iter().map(decode).collect()
}

/// Repository for operation database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.operations();
/// let op = repo.insert(Operation::new("BANK", date, "Rent", DebitOrCredit::Debit, amount)).await?;
/// let gross = op.gross_amount()?; // computed, not loaded
/// ```
#[derive(Debug, Clone)]
pub struct OperationRepository {
    pool: SqlitePool,
}

impl OperationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OperationRepository { pool }
    }

    async fn ensure_account(&self, account_id: &str) -> DbResult<()> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM accounts WHERE id = ?1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        match found {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("Account", account_id)),
        }
    }

    /// Cleans and inserts an operation, stamping `input_date` with today.
    ///
    /// ## Returns
    /// * `Ok(Operation)` - the record as stored (rates normalised)
    /// * `Err(DbError::Validation)` - e.g. "Amount must be a positive number"
    /// * `Err(DbError::NotFound)` - the account doesn't exist
    pub async fn insert(&self, mut operation: Operation) -> DbResult<Operation> {
        operation.clean()?;
        operation.input_date = Utc::now().date_naive();
        self.ensure_account(&operation.account_id).await?;

        debug!(
            id = %operation.id,
            account = %operation.account_id,
            amount = %operation.amount,
            "Inserting operation"
        );

        sqlx::query(
            r#"
            INSERT INTO operations (
                id, operation_date, input_date, label, debit_or_credit, account_id,
                amount_cents, all_tax_included, apply_vat, vat_rate_bps,
                apply_provision, provision_rate_bps, comment
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&operation.id)
        .bind(operation.operation_date)
        .bind(operation.input_date)
        .bind(&operation.label)
        .bind(operation.debit_or_credit.code())
        .bind(&operation.account_id)
        .bind(operation.amount.cents())
        .bind(operation.all_tax_included)
        .bind(operation.apply_vat)
        .bind(operation.vat_rate.bps())
        .bind(operation.apply_provision)
        .bind(operation.provision_rate.bps())
        .bind(&operation.comment)
        .execute(&self.pool)
        .await?;

        Ok(operation)
    }

    /// Cleans and updates an existing operation. `input_date` is kept.
    pub async fn update(&self, mut operation: Operation) -> DbResult<Operation> {
        operation.clean()?;
        self.ensure_account(&operation.account_id).await?;

        debug!(id = %operation.id, "Updating operation");

        let result = sqlx::query(
            r#"
            UPDATE operations SET
                operation_date = ?2,
                label = ?3,
                debit_or_credit = ?4,
                account_id = ?5,
                amount_cents = ?6,
                all_tax_included = ?7,
                apply_vat = ?8,
                vat_rate_bps = ?9,
                apply_provision = ?10,
                provision_rate_bps = ?11,
                comment = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&operation.id)
        .bind(operation.operation_date)
        .bind(&operation.label)
        .bind(operation.debit_or_credit.code())
        .bind(&operation.account_id)
        .bind(operation.amount.cents())
        .bind(operation.all_tax_included)
        .bind(operation.apply_vat)
        .bind(operation.vat_rate.bps())
        .bind(operation.apply_provision)
        .bind(operation.provision_rate.bps())
        .bind(&operation.comment)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Operation", &operation.id));
        }

        match self.get_by_id(&operation.id).await? {
            Some(stored) => Ok(stored),
            None => Err(DbError::not_found("Operation", &operation.id)),
        }
    }

    /// Gets an operation by its id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Operation>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query_as::<_, OperationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode).transpose()
    }

    /// Lists the operations of one account, oldest first.
    pub async fn list_for_account(&self, account_id: &str) -> DbResult<Vec<Operation>> {
        let sql = format!("{SELECT_COLUMNS} WHERE account_id = ?1 ORDER BY operation_date, id");
        let rows = sqlx::query_as::<_, OperationRow>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(account = %account_id, count = rows.len(), "Listed operations");
        decode_all(rows)
    }

    /// Lists every operation, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Operation>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY operation_date, id");
        let rows = sqlx::query_as::<_, OperationRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        decode_all(rows)
    }

    /// Deletes an operation.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting operation");

        let result = sqlx::query("DELETE FROM operations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Operation", id));
        }

        Ok(())
    }

    /// Number of operations booked against an account.
    pub async fn operation_count(&self, account_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations WHERE account_id = ?1")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts all operations.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
