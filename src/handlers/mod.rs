//! HTTP request handlers (route handlers).
//!
//! Handlers decode requests, call the balance service and map its outcome
//! to a response. They hold no logic of their own.

/// Balance endpoints
pub mod balance;
/// Service health endpoint
pub mod health;
