//! PostgreSQL implementation of `AccountsRepository`.
//!
//! # Atomicity Guarantees
//!
//! Every mutation runs inside one PostgreSQL transaction. Balance decrements
//! are conditional (`WHERE balance >= amount`), so the funds check and the
//! write are a single statement and concurrent withdrawals cannot overdraw.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::{
    db::{CREATE_TABLES, DROP_TABLES, DbPool},
    error::AppError,
    models::{
        account::Account,
        transaction::{Transaction, TransactionType},
    },
    repository::{AccountsRepository, SEED_ACCOUNTS, SEED_DESCRIPTION},
};

#[derive(Debug, Clone)]
pub struct PgAccountsRepository {
    pool: DbPool,
}

impl PgAccountsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Record one ledger row on `conn`.
async fn insert_ledger_entry(
    conn: &mut PgConnection,
    transaction_type: TransactionType,
    from_account_id: Option<i32>,
    to_account_id: Option<i32>,
    amount: Decimal,
    description: Option<&str>,
) -> Result<Transaction, AppError> {
    let entry = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            from_account_id,
            to_account_id,
            transaction_type,
            amount,
            description
        )
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, from_account_id, to_account_id, transaction_type, amount, timestamp, description
        "#,
    )
    .bind(from_account_id)
    .bind(to_account_id)
    .bind(transaction_type.as_str())
    .bind(amount)
    .bind(description)
    .fetch_one(conn)
    .await?;

    Ok(entry)
}

/// Credit an account and write its ledger row on `conn`.
async fn apply_deposit(
    conn: &mut PgConnection,
    account_id: i32,
    amount: Decimal,
    description: &str,
) -> Result<Account, AppError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts
        SET balance = balance + $1
        WHERE id = $2
        RETURNING id, account_type, balance
        "#,
    )
    .bind(amount)
    .bind(account_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::AccountNotFound)?;

    insert_ledger_entry(
        conn,
        TransactionType::Deposit,
        None,
        Some(account_id),
        amount,
        Some(description),
    )
    .await?;

    Ok(account)
}

/// Debit an account only if it holds at least `amount`.
///
/// Returns `None` when the row was left untouched, either because the account
/// is missing or because the balance is too low.
async fn conditional_debit(
    conn: &mut PgConnection,
    account_id: i32,
    amount: Decimal,
) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts
        SET balance = balance - $1
        WHERE id = $2 AND balance >= $1
        RETURNING id, account_type, balance
        "#,
    )
    .bind(amount)
    .bind(account_id)
    .fetch_optional(conn)
    .await?;

    Ok(account)
}

#[async_trait]
impl AccountsRepository for PgAccountsRepository {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn wipe_and_seed(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for statement in DROP_TABLES.iter().chain(CREATE_TABLES) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        for (account_type, seed_amount) in SEED_ACCOUNTS {
            let account_id: i32 = sqlx::query_scalar(
                "INSERT INTO accounts (account_type, balance) VALUES ($1, 0) RETURNING id",
            )
            .bind(account_type.as_str())
            .fetch_one(&mut *tx)
            .await?;

            apply_deposit(&mut tx, account_id, seed_amount, SEED_DESCRIPTION).await?;
        }

        tx.commit().await?;
        tracing::info!(accounts = SEED_ACCOUNTS.len(), "Database wiped and seeded");

        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for statement in CREATE_TABLES {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, AppError> {
        // Unpaginated; there are only a handful of accounts.
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT id, account_type, balance FROM accounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn get_account(&self, account_id: i32) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, account_type, balance FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn get_account_transactions(
        &self,
        account_id: i32,
    ) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, from_account_id, to_account_id, transaction_type, amount, timestamp, description
            FROM transactions
            WHERE from_account_id = $1 OR to_account_id = $1
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn deposit(
        &self,
        account_id: i32,
        amount: Decimal,
        description: &str,
    ) -> Result<Account, AppError> {
        let mut tx = self.pool.begin().await?;

        let account = match apply_deposit(&mut tx, account_id, amount, description).await {
            Ok(account) => account,
            Err(err) => {
                tx.rollback().await?;
                return Err(err);
            }
        };

        tx.commit().await?;

        Ok(account)
    }

    async fn withdraw(
        &self,
        account_id: i32,
        amount: Decimal,
        description: &str,
    ) -> Result<Account, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(account) = conditional_debit(&mut tx, account_id, amount).await? else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
                    .bind(account_id)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Err(if exists {
                AppError::InsufficientFunds
            } else {
                AppError::AccountNotFound
            });
        };

        insert_ledger_entry(
            &mut tx,
            TransactionType::Withdrawal,
            Some(account_id),
            None,
            amount,
            Some(description),
        )
        .await?;

        tx.commit().await?;

        Ok(account)
    }

    async fn transfer(
        &self,
        from_account_id: i32,
        to_account_id: i32,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<(Account, Account), AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock both rows in id order so opposing transfers cannot deadlock.
        let locked: Vec<i32> = sqlx::query_scalar(
            "SELECT id FROM accounts WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(vec![from_account_id, to_account_id])
        .fetch_all(&mut *tx)
        .await?;

        if !locked.contains(&from_account_id) || !locked.contains(&to_account_id) {
            tx.rollback().await?;
            return Err(AppError::AccountNotFound);
        }

        let Some(from) = conditional_debit(&mut tx, from_account_id, amount).await? else {
            tx.rollback().await?;
            return Err(AppError::InsufficientFunds);
        };

        let to = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET balance = balance + $1
            WHERE id = $2
            RETURNING id, account_type, balance
            "#,
        )
        .bind(amount)
        .bind(to_account_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_ledger_entry(
            &mut tx,
            TransactionType::Transfer,
            Some(from_account_id),
            Some(to_account_id),
            amount,
            description,
        )
        .await?;

        // Dropping `tx` on any `?` above rolls everything back.
        tx.commit().await?;

        Ok((from, to))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
