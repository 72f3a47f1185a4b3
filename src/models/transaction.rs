//! Ledger entry data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a ledger entry
//! - `TransactionType`: Deposit, withdrawal or transfer
//! - `TransferRequest` / `TransferResponse`: Transfer request and result bodies

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::account::Account;

/// Kind of balance-affecting event recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown transaction type '{0}'")]
pub struct UnknownTransactionType(String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(UnknownTransactionType(other.to_string())),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = UnknownTransactionType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents a ledger entry from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Entries are append-only: one row is
/// written in the same database transaction as every balance change.
///
/// | type         | from_account_id | to_account_id |
/// |--------------|-----------------|---------------|
/// | `deposit`    | NULL            | account       |
/// | `withdrawal` | account         | NULL          |
/// | `transfer`   | source          | destination   |
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier for this ledger entry
    pub id: i32,

    /// Account the money left (NULL for money arriving from outside)
    pub from_account_id: Option<i32>,

    /// Account the money arrived in (NULL for money leaving the bank)
    pub to_account_id: Option<i32>,

    #[sqlx(try_from = "String")]
    pub transaction_type: TransactionType,

    /// Always positive (enforced by CHECK constraint)
    pub amount: Decimal,

    pub timestamp: DateTime<Utc>,

    pub description: Option<String>,
}

impl Transaction {
    /// Whether this entry touches `account_id` on either side.
    pub fn involves(&self, account_id: i32) -> bool {
        self.from_account_id == Some(account_id) || self.to_account_id == Some(account_id)
    }
}

/// Request to move money between two accounts.
///
/// # JSON Example
///
/// ```json
/// {
///   "fromAccountId": 1,
///   "toAccountId": 2,
///   "amount": 500,
///   "description": "Rent share"
/// }
/// ```
///
/// # Atomicity Guarantee
///
/// Both balances and the ledger entry are written in one database transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account_id: i32,
    pub to_account_id: i32,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// Both accounts as they stand after a transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub from: Account,
    pub to: Account,
}
