//! Ledger store - durable, atomic mutation of account balances.
//!
//! The store exclusively owns persisted balance state. Every mutating
//! operation runs as one atomic unit scoped to that call only, and the
//! conditional debit is evaluated against the latest committed balance, so
//! concurrent debits against the same user can never overdraw it.
//!
//! # Implementations
//!
//! - [`PgLedgerStore`]: PostgreSQL, used by the server
//! - [`MemoryLedgerStore`]: in-process, same semantics, used for tests

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{error::AppError, models::balance::AccountBalance};

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Decimal places a stored balance may carry (`NUMERIC(28, 8)`).
pub const BALANCE_SCALE: u32 = 8;

/// Largest balance a single account may hold: 99999999999999999999.99999999.
pub const MAX_BALANCE: Decimal =
    Decimal::from_parts(268435455, 1042612833, 542101086, false, BALANCE_SCALE);

/// Storage contract consumed by the balance service.
///
/// Implementations do not validate amounts; callers are expected to pass
/// strictly positive values no larger than [`MAX_BALANCE`] with at most
/// [`BALANCE_SCALE`] decimal places.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Add `amount` to the user's balance, creating the row if it does not
    /// exist yet. Insert-or-increment is a single atomic step.
    ///
    /// Fails with `BalanceLimitExceeded`, leaving the row untouched, when the
    /// result would be above [`MAX_BALANCE`].
    async fn credit(&self, user_id: i64, amount: Decimal) -> Result<(), AppError>;

    /// Subtract `amount` only if the current balance covers it.
    ///
    /// Fails with `InsufficientFunds` when the guard does not hold, which
    /// includes users that have no row at all.
    async fn debit(&self, user_id: i64, amount: Decimal) -> Result<(), AppError>;

    /// Conditional debit of `from_user_id` plus credit-or-create of
    /// `to_user_id`, all or nothing. Either side failing (`InsufficientFunds`,
    /// `BalanceLimitExceeded`, `Store`) leaves both rows as they were.
    async fn transfer(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        amount: Decimal,
    ) -> Result<(), AppError>;

    /// Current balance row. Fails with `NotFound` for unknown users.
    async fn balance(&self, user_id: i64) -> Result<AccountBalance, AppError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
