//! Data models representing database entities and API bodies.

/// Account balance row and balance request/response types
pub mod balance;
