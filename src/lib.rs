//! Balance Service
//!
//! A ledger-style HTTP service that credits ("introduction"), debits,
//! transfers and queries one current balance per user.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Layers**: handlers → [`BalanceService`] → [`LedgerStore`]
//!
//! All money movement is funneled through the ledger store's transactional
//! primitives; nothing above the store caches balances or holds locks.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use services::BalanceService;
pub use store::LedgerStore;

/// Build the HTTP router for the given service.
///
/// Requests with an unsupported method on a known path get 405 from the
/// method router.
pub fn router(service: BalanceService) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/balance/introduction", post(handlers::balance::introduction))
        .route("/balance/debit", post(handlers::balance::debit))
        .route("/balance/transfer", post(handlers::balance::transfer))
        .route("/balance/get", get(handlers::balance::get_balance_by_query))
        .route("/balance/get/{user_id}", get(handlers::balance::get_balance))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
