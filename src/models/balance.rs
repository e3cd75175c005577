//! Balance data models and API request/response types.
//!
//! This module defines:
//! - `AccountBalance`: database row holding a user's current balance
//! - `Balance`: the `{user_id, balance}` record returned by balance queries
//! - Request bodies for introduction, debit and transfer

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a row of the `account_balance` table.
///
/// Rows are created implicitly by the first credit for a user and are never
/// deleted. `balance` is kept non-negative by the conditional debit and by a
/// CHECK constraint on the column.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct AccountBalance {
    /// User identity, unique per row
    pub user_id: i64,

    /// Current balance, exact decimal
    pub balance: Decimal,

    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,
}

/// Current balance of a user as returned to callers.
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": 1,
///   "balance": 100.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: i64,
    pub balance: Decimal,
}

impl From<AccountBalance> for Balance {
    fn from(row: AccountBalance) -> Self {
        Self {
            user_id: row.user_id,
            balance: row.balance,
        }
    }
}

/// Request to credit ("introduce") money to a user.
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": 1,
///   "amount": 100.0
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct IntroductionRequest {
    pub user_id: i64,
    pub amount: Decimal,
}

/// Request to debit money from a user.
#[derive(Debug, Deserialize)]
pub struct DebitRequest {
    pub user_id: i64,
    pub amount: Decimal,
}

/// Request to move money from one user to another.
///
/// # JSON Example
///
/// ```json
/// {
///   "from_user_id": 1,
///   "to_user_id": 2,
///   "amount": 60.0
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub amount: Decimal,
}

/// Query string for `GET /balance/get?user_id=`.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: i64,
}

/// Body returned by successful mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
