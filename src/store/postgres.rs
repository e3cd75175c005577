//! PostgreSQL ledger store.
//!
//! # Atomicity Guarantees
//!
//! Every mutation runs inside its own PostgreSQL transaction. Debits are a
//! single guarded `UPDATE .. WHERE balance >= $amount`; under READ COMMITTED a
//! concurrent writer blocks on the row lock and the guard is re-evaluated
//! against the committed result, so two debits can never both pass against
//! the same funds.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{db::DbPool, error::AppError, models::balance::AccountBalance, store::LedgerStore};

/// Insert-or-increment used by both credit and the receiving side of transfer.
const UPSERT_CREDIT: &str = r#"
    INSERT INTO account_balance (user_id, balance, updated_at)
    VALUES ($1, $2, NOW())
    ON CONFLICT (user_id) DO UPDATE
    SET balance = account_balance.balance + EXCLUDED.balance,
        updated_at = NOW()
"#;

/// Decrement guarded by the balance check in the same statement.
const CONDITIONAL_DEBIT: &str = r#"
    UPDATE account_balance
    SET balance = balance - $1,
        updated_at = NOW()
    WHERE user_id = $2 AND balance >= $1
"#;

/// SQLSTATE raised when a value does not fit `NUMERIC(28, 8)`.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Map a failed credit upsert, turning a balance that no longer fits the
/// column into `BalanceLimitExceeded`.
fn credit_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) {
            return AppError::BalanceLimitExceeded;
        }
    }
    AppError::Store(err)
}

/// Ledger store backed by the `account_balance` table.
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: DbPool,
}

impl PgLedgerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    #[tracing::instrument(skip(self))]
    async fn credit(&self, user_id: i64, amount: Decimal) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(UPSERT_CREDIT)
            .bind(user_id)
            .bind(amount)
            .execute(&mut *tx)
            .await
            .map_err(credit_error)?;

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn debit(&self, user_id: i64, amount: Decimal) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(CONDITIONAL_DEBIT)
            .bind(amount)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Err(AppError::InsufficientFunds);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn transfer(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        amount: Decimal,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock both existing rows lowest user_id first, so transfers running in
        // opposite directions between the same pair cannot deadlock.
        sqlx::query("SELECT user_id FROM account_balance WHERE user_id = ANY($1) ORDER BY user_id FOR UPDATE")
            .bind(vec![from_user_id, to_user_id])
            .fetch_all(&mut *tx)
            .await?;

        let debited = sqlx::query(CONDITIONAL_DEBIT)
            .bind(amount)
            .bind(from_user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if debited == 0 {
            tx.rollback().await?;
            return Err(AppError::InsufficientFunds);
        }

        sqlx::query(UPSERT_CREDIT)
            .bind(to_user_id)
            .bind(amount)
            .execute(&mut *tx)
            .await
            .map_err(credit_error)?;

        // Dropping `tx` on any early return above rolls everything back
        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn balance(&self, user_id: i64) -> Result<AccountBalance, AppError> {
        sqlx::query_as::<_, AccountBalance>(
            "SELECT user_id, balance, updated_at FROM account_balance WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    #[tracing::instrument(skip(self))]
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
