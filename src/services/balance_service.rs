//! Balance service - precondition validation and orchestration.
//!
//! This service:
//! - Rejects non-positive amounts and self-transfers before touching storage
//! - Delegates each operation to exactly one ledger store call
//! - Surfaces every store outcome unchanged, without retries
//!
//! The service holds no balance state of its own. It never reads a balance
//! to decide whether to write one; the store's conditional debit is the only
//! overdraft guard.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::balance::Balance,
    store::{BALANCE_SCALE, LedgerStore, MAX_BALANCE},
};

/// Entry point for all balance operations.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct BalanceService {
    store: Arc<dyn LedgerStore>,
}

/// Amount must be positive, fit a single balance and carry no more decimal
/// places than the store keeps.
fn validate_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO
        || amount > MAX_BALANCE
        || amount.normalize().scale() > BALANCE_SCALE
    {
        return Err(AppError::InvalidAmount);
    }
    Ok(())
}

impl BalanceService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Credit `amount` to a user, creating the account on first use.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is not positive, too large or too precise
    /// - `BalanceLimitExceeded`: the new balance would exceed `MAX_BALANCE`
    /// - `Store`: database error occurred
    #[tracing::instrument(skip(self))]
    pub async fn introduce(&self, user_id: i64, amount: Decimal) -> Result<(), AppError> {
        validate_amount(amount)?;
        self.store.credit(user_id, amount).await?;
        tracing::info!(user_id, %amount, "introduction applied");
        Ok(())
    }

    /// Remove `amount` from a user's balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is not positive, too large or too precise
    /// - `InsufficientFunds`: balance is lower than amount, or user unknown
    /// - `Store`: database error occurred
    #[tracing::instrument(skip(self))]
    pub async fn debit(&self, user_id: i64, amount: Decimal) -> Result<(), AppError> {
        validate_amount(amount)?;
        self.store.debit(user_id, amount).await?;
        tracing::info!(user_id, %amount, "debit applied");
        Ok(())
    }

    /// Move `amount` from one user to another atomically.
    ///
    /// The receiving account is created if it does not exist.
    ///
    /// # Errors
    ///
    /// - `SameAccount`: source and destination are equal (checked first)
    /// - `InvalidAmount`: amount is not positive, too large or too precise
    /// - `InsufficientFunds`: source balance is lower than amount
    /// - `BalanceLimitExceeded`: destination balance would exceed `MAX_BALANCE`
    /// - `Store`: database error occurred; nothing was applied
    #[tracing::instrument(skip(self))]
    pub async fn transfer(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        amount: Decimal,
    ) -> Result<(), AppError> {
        if from_user_id == to_user_id {
            return Err(AppError::SameAccount);
        }
        validate_amount(amount)?;

        self.store.transfer(from_user_id, to_user_id, amount).await?;
        tracing::info!(from_user_id, to_user_id, %amount, "transfer applied");
        Ok(())
    }

    /// Current balance of a user.
    ///
    /// # Errors
    ///
    /// - `NotFound`: user has never been credited
    /// - `Store`: database error occurred
    #[tracing::instrument(skip(self))]
    pub async fn get_balance(&self, user_id: i64) -> Result<Balance, AppError> {
        let row = self.store.balance(user_id).await?;
        Ok(row.into())
    }

    /// Check that the ledger store is reachable.
    pub async fn health(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}
