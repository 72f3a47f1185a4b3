//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response bodies built from them.

/// Account model
pub mod account;
/// Ledger entry model
pub mod transaction;
