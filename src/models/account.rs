//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing a balance-holding account
//! - `AccountType`: Checking or savings classification
//! - `AccountWithDetails`: Account plus its ledger history
//! - `DepositRequest` / `WithdrawalRequest`: Request bodies for balance mutations

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::transaction::Transaction;

/// Kind of account. Stored as lowercase text in the `accounts` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored account type is neither `checking` nor `savings`.
#[derive(Debug, thiserror::Error)]
#[error("unknown account type '{0}'")]
pub struct UnknownAccountType(String);

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            other => Err(UnknownAccountType(other.to_string())),
        }
    }
}

impl TryFrom<String> for AccountType {
    type Error = UnknownAccountType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table. Accounts are created by the seed operation,
/// mutated by deposits, withdrawals and transfers, and never deleted.
///
/// # Balance Storage
///
/// Balances are `NUMERIC(18,2)` in PostgreSQL and `rust_decimal::Decimal` here,
/// so currency arithmetic never goes through floating point.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier for this account
    pub id: i32,

    /// Checking or savings
    #[sqlx(try_from = "String")]
    pub account_type: AccountType,

    /// Current balance
    ///
    /// Kept non-negative by the withdrawal and transfer paths, which only
    /// decrement when `balance >= amount`.
    pub balance: Decimal,
}

/// An account together with every ledger entry that references it.
///
/// # JSON Example
///
/// ```json
/// {
///   "account": { "id": 1, "accountType": "checking", "balance": "1500.00" },
///   "transactions": [
///     {
///       "id": 5,
///       "fromAccountId": null,
///       "toAccountId": 1,
///       "transactionType": "deposit",
///       "amount": "500.00",
///       "timestamp": "2025-12-20T10:00:00Z",
///       "description": "Web deposit"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountWithDetails {
    pub account: Account,

    /// Ledger entries, most recent first
    pub transactions: Vec<Transaction>,
}

/// Request body for `POST /accounts/{id}/deposit`.
///
/// The amount may be sent as a JSON number or a decimal string.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Decimal,
}

/// Request body for `POST /accounts/{id}/withdrawal`.
#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn account_type_parses_stored_text() {
        assert_eq!("checking".parse::<AccountType>().unwrap(), AccountType::Checking);
        assert_eq!(
            AccountType::try_from("savings".to_string()).unwrap(),
            AccountType::Savings
        );
        assert!("brokerage".parse::<AccountType>().is_err());
    }

    #[test]
    fn account_serializes_with_camel_case_fields() {
        let account = Account {
            id: 1,
            account_type: AccountType::Checking,
            balance: dec!(1500.00),
        };

        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["accountType"], "checking");
        assert_eq!(json["balance"], "1500.00");
    }

    #[test]
    fn deposit_request_accepts_number_or_string() {
        let from_number: DepositRequest = serde_json::from_str(r#"{"amount": 500}"#).unwrap();
        let from_string: DepositRequest = serde_json::from_str(r#"{"amount": "12.34"}"#).unwrap();

        assert_eq!(from_number.amount, dec!(500));
        assert_eq!(from_string.amount, dec!(12.34));
    }
}
