//! In-memory ledger store.
//!
//! Holds every balance behind one mutex; each operation keeps the lock for
//! its whole read-modify-write, which gives the same atomicity as the
//! PostgreSQL store, including across both rows of a transfer.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::balance::AccountBalance,
    store::{LedgerStore, MAX_BALANCE},
};

#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    accounts: Mutex<HashMap<i64, AccountBalance>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> MutexGuard<'_, HashMap<i64, AccountBalance>> {
        // Every write completes before the guard drops, so a poisoned map is still consistent
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Balance `user_id` would hold after crediting `amount`.
fn credited_balance(
    accounts: &HashMap<i64, AccountBalance>,
    user_id: i64,
    amount: Decimal,
) -> Result<Decimal, AppError> {
    let current = accounts
        .get(&user_id)
        .map_or(Decimal::ZERO, |row| row.balance);

    current
        .checked_add(amount)
        .filter(|balance| *balance <= MAX_BALANCE)
        .ok_or(AppError::BalanceLimitExceeded)
}

fn apply_credit(
    accounts: &mut HashMap<i64, AccountBalance>,
    user_id: i64,
    amount: Decimal,
) -> Result<(), AppError> {
    let balance = credited_balance(accounts, user_id, amount)?;
    accounts.insert(
        user_id,
        AccountBalance {
            user_id,
            balance,
            updated_at: Utc::now(),
        },
    );
    Ok(())
}

fn apply_debit(
    accounts: &mut HashMap<i64, AccountBalance>,
    user_id: i64,
    amount: Decimal,
) -> Result<(), AppError> {
    match accounts.get_mut(&user_id) {
        Some(row) if row.balance >= amount => {
            row.balance -= amount;
            row.updated_at = Utc::now();
            Ok(())
        }
        _ => Err(AppError::InsufficientFunds),
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn credit(&self, user_id: i64, amount: Decimal) -> Result<(), AppError> {
        apply_credit(&mut self.accounts(), user_id, amount)
    }

    async fn debit(&self, user_id: i64, amount: Decimal) -> Result<(), AppError> {
        apply_debit(&mut self.accounts(), user_id, amount)
    }

    async fn transfer(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        amount: Decimal,
    ) -> Result<(), AppError> {
        let mut accounts = self.accounts();
        // Check the receiving side before mutating anything
        credited_balance(&accounts, to_user_id, amount)?;
        apply_debit(&mut accounts, from_user_id, amount)?;
        apply_credit(&mut accounts, to_user_id, amount)
    }

    async fn balance(&self, user_id: i64) -> Result<AccountBalance, AppError> {
        self.accounts()
            .get(&user_id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
