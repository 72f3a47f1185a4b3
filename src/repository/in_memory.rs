//! In-memory implementation of `AccountsRepository`.
//!
//! All state sits behind one `RwLock`. Each mutation holds the write lock for
//! its whole duration, which gives it the same all-or-nothing behaviour as a
//! database transaction. Compiled into the binary so the service can run with
//! `STORAGE=memory` and no PostgreSQL instance.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        account::Account,
        transaction::{Transaction, TransactionType},
    },
    repository::{AccountsRepository, MONEY_SCALE, SEED_ACCOUNTS, SEED_DESCRIPTION},
};

/// Same scale as the `NUMERIC(18, 2)` columns, so both backends serialize alike.
fn to_money(value: Decimal) -> Decimal {
    let mut value = value;
    value.rescale(MONEY_SCALE);
    value
}

#[derive(Debug, Default)]
struct State {
    accounts: BTreeMap<i32, Account>,
    transactions: Vec<Transaction>,
    next_account_id: i32,
    next_transaction_id: i32,
}

impl State {
    fn record(
        &mut self,
        transaction_type: TransactionType,
        from_account_id: Option<i32>,
        to_account_id: Option<i32>,
        amount: Decimal,
        description: Option<&str>,
    ) {
        self.next_transaction_id += 1;
        self.transactions.push(Transaction {
            id: self.next_transaction_id,
            from_account_id,
            to_account_id,
            transaction_type,
            amount: to_money(amount),
            timestamp: Utc::now(),
            description: description.map(str::to_string),
        });
    }

    fn credit(
        &mut self,
        account_id: i32,
        amount: Decimal,
        description: &str,
    ) -> Result<Account, AppError> {
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(AppError::AccountNotFound)?;
        account.balance = to_money(account.balance + amount);
        let updated = account.clone();

        self.record(
            TransactionType::Deposit,
            None,
            Some(account_id),
            amount,
            Some(description),
        );

        Ok(updated)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAccountsRepository {
    state: RwLock<State>,
}

impl InMemoryAccountsRepository {
    /// An empty store. Call `wipe_and_seed` to load the demo accounts.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountsRepository for InMemoryAccountsRepository {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn wipe_and_seed(&self) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        *state = State::default();

        for (account_type, seed_amount) in SEED_ACCOUNTS {
            state.next_account_id += 1;
            let id = state.next_account_id;
            state.accounts.insert(
                id,
                Account {
                    id,
                    account_type,
                    balance: to_money(Decimal::ZERO),
                },
            );
            state.credit(id, seed_amount, SEED_DESCRIPTION)?;
        }

        tracing::info!(accounts = SEED_ACCOUNTS.len(), "In-memory store wiped and seeded");
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, AppError> {
        let state = self.state.read().await;
        Ok(state.accounts.values().cloned().collect())
    }

    async fn get_account(&self, account_id: i32) -> Result<Option<Account>, AppError> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&account_id).cloned())
    }

    async fn get_account_transactions(
        &self,
        account_id: i32,
    ) -> Result<Vec<Transaction>, AppError> {
        let state = self.state.read().await;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|entry| entry.involves(account_id))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));

        Ok(transactions)
    }

    async fn deposit(
        &self,
        account_id: i32,
        amount: Decimal,
        description: &str,
    ) -> Result<Account, AppError> {
        let mut state = self.state.write().await;
        state.credit(account_id, amount, description)
    }

    async fn withdraw(
        &self,
        account_id: i32,
        amount: Decimal,
        description: &str,
    ) -> Result<Account, AppError> {
        let mut state = self.state.write().await;

        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or(AppError::AccountNotFound)?;
        if account.balance < amount {
            return Err(AppError::InsufficientFunds);
        }
        account.balance = to_money(account.balance - amount);
        let updated = account.clone();

        state.record(
            TransactionType::Withdrawal,
            Some(account_id),
            None,
            amount,
            Some(description),
        );

        Ok(updated)
    }

    async fn transfer(
        &self,
        from_account_id: i32,
        to_account_id: i32,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<(Account, Account), AppError> {
        let mut state = self.state.write().await;

        // Check everything before touching either balance.
        let from_balance = state
            .accounts
            .get(&from_account_id)
            .ok_or(AppError::AccountNotFound)?
            .balance;
        if !state.accounts.contains_key(&to_account_id) {
            return Err(AppError::AccountNotFound);
        }
        if from_balance < amount {
            return Err(AppError::InsufficientFunds);
        }

        let mut apply = |id: i32, delta: Decimal| -> Result<Account, AppError> {
            let account = state.accounts.get_mut(&id).ok_or(AppError::AccountNotFound)?;
            account.balance = to_money(account.balance + delta);
            Ok(account.clone())
        };
        let from = apply(from_account_id, -amount)?;
        let to = apply(to_account_id, amount)?;

        state.record(
            TransactionType::Transfer,
            Some(from_account_id),
            Some(to_account_id),
            amount,
            description,
        );

        Ok((from, to))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
