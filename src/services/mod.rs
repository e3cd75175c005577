//! Business logic services.
//!
//! Services validate operation preconditions and orchestrate ledger store
//! calls. They sit between the HTTP handlers and the store.

pub mod balance_service;

pub use balance_service::BalanceService;
