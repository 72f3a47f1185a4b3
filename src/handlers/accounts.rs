//! Account read HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - GET /accounts - List all accounts
//! - GET /accounts/{id} - Get one account with its ledger history

use crate::{
    error::AppError,
    extract::AppPath,
    models::account::{Account, AccountWithDetails},
    state::AppState,
};
use axum::{Json, extract::State};

/// List all accounts.
///
/// # Endpoint
///
/// `GET /accounts`
///
/// # Response
///
/// - **Success (200 OK)**: Array of accounts ordered by id
/// - **Error (503)**: Injected transient failure, safe to retry
///
/// ```json
/// [
///   { "id": 1, "accountType": "checking", "balance": "1000.00" },
///   { "id": 2, "accountType": "savings", "balance": "5000.00" }
/// ]
/// ```
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.accounts.get_accounts().await?;

    Ok(Json(accounts))
}

/// Get a specific account and its transactions.
///
/// # Endpoint
///
/// `GET /accounts/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: `{ "account": {...}, "transactions": [...] }`, most recent entry first
/// - **Error (404)**: Account not found
pub async fn get_account(
    State(state): State<AppState>,
    AppPath(account_id): AppPath<i32>,
) -> Result<Json<AccountWithDetails>, AppError> {
    let details = state.accounts.get_account_details(account_id).await?;

    Ok(Json(details))
}
