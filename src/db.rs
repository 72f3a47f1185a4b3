//! Database connection pool and schema management.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - The DDL for the `accounts` and `transactions` tables

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// A connection pool maintains multiple database connections that can be reused across HTTP requests which is much more efficient than opening a new connection for each request.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Upper bound on open connections
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Statements that remove both tables. Ledger first, it references accounts.
pub const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS transactions",
    "DROP TABLE IF EXISTS accounts",
];

/// Statements that create both tables when they are missing.
pub const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id SERIAL PRIMARY KEY,
        account_type TEXT NOT NULL CHECK (account_type IN ('checking', 'savings')),
        balance NUMERIC(18, 2) NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id SERIAL PRIMARY KEY,
        from_account_id INT REFERENCES accounts (id),
        to_account_id INT REFERENCES accounts (id),
        transaction_type TEXT NOT NULL CHECK (transaction_type IN ('deposit', 'withdrawal', 'transfer')),
        amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
        timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        description TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS transactions_from_account_idx ON transactions (from_account_id)",
    "CREATE INDEX IF NOT EXISTS transactions_to_account_idx ON transactions (to_account_id)",
];
