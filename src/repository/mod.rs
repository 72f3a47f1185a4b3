//! Persistence for accounts and the ledger.
//!
//! `AccountsRepository` is the seam between the service layer and storage.
//! Every mutation writes the balance change and its ledger entry together or
//! not at all.
//!
//! Two implementations are provided:
//! - `PgAccountsRepository`: PostgreSQL via sqlx
//! - `InMemoryAccountsRepository`: process-local state, used for dev runs
//!   without a database and by the test suites

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    error::AppError,
    models::{account::Account, account::AccountType, transaction::Transaction},
};

pub use in_memory::InMemoryAccountsRepository;
pub use postgres::PgAccountsRepository;

/// Accounts created by `wipe_and_seed`, in id order, with their seed deposit.
pub const SEED_ACCOUNTS: [(AccountType, Decimal); 4] = [
    (AccountType::Checking, dec!(1000)),
    (AccountType::Savings, dec!(5000)),
    (AccountType::Checking, dec!(500)),
    (AccountType::Savings, dec!(10000)),
];

pub const SEED_DESCRIPTION: &str = "Seed deposit";

/// Decimal places kept for balances and ledger amounts (`NUMERIC(18, 2)`).
pub const MONEY_SCALE: u32 = 2;

#[async_trait]
pub trait AccountsRepository: Send + Sync {
    /// Short backend name, reported by the health check.
    fn backend_name(&self) -> &'static str;

    /// Drop and recreate all tables, then seed `SEED_ACCOUNTS`.
    ///
    /// Destructive. Dev/demo bootstrap only.
    async fn wipe_and_seed(&self) -> Result<(), AppError>;

    /// Create the tables if they do not exist. Never touches existing rows.
    async fn ensure_schema(&self) -> Result<(), AppError>;

    /// All accounts ordered by id.
    async fn get_accounts(&self) -> Result<Vec<Account>, AppError>;

    async fn get_account(&self, account_id: i32) -> Result<Option<Account>, AppError>;

    /// Ledger entries touching `account_id`, most recent first.
    async fn get_account_transactions(&self, account_id: i32)
    -> Result<Vec<Transaction>, AppError>;

    /// Credit `amount` and record a `deposit` entry.
    ///
    /// Fails with `AccountNotFound` if the account does not exist.
    async fn deposit(
        &self,
        account_id: i32,
        amount: Decimal,
        description: &str,
    ) -> Result<Account, AppError>;

    /// Debit `amount` and record a `withdrawal` entry.
    ///
    /// The debit only applies while `balance >= amount`; otherwise fails with
    /// `InsufficientFunds` and nothing is written.
    async fn withdraw(
        &self,
        account_id: i32,
        amount: Decimal,
        description: &str,
    ) -> Result<Account, AppError>;

    /// Move `amount` between two accounts and record one `transfer` entry.
    ///
    /// Returns `(from, to)` after the update.
    async fn transfer(
        &self,
        from_account_id: i32,
        to_account_id: i32,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<(Account, Account), AppError>;

    /// Check that storage is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
