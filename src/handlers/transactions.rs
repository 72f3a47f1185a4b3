//! Balance mutation HTTP handlers.
//!
//! This module implements the money-moving API endpoints:
//! - POST /accounts/{id}/deposit - Add money to an account
//! - POST /accounts/{id}/withdrawal - Remove money from an account
//! - POST /accounts/transfer - Move money between accounts

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::{
        account::{Account, DepositRequest, WithdrawalRequest},
        transaction::{TransferRequest, TransferResponse},
    },
    state::AppState,
};
use axum::{Json, extract::State};

/// Deposit into an account.
///
/// # Request Body
///
/// ```json
/// { "amount": 500 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: The updated account
/// - **Error (400)**: `invalid_amount` or `limit_exceeded` (cap is 10,000)
/// - **Error (404)**: Account not found
pub async fn deposit(
    State(state): State<AppState>,
    AppPath(account_id): AppPath<i32>,
    AppJson(request): AppJson<DepositRequest>,
) -> Result<Json<Account>, AppError> {
    let account = state.accounts.deposit(account_id, request.amount).await?;

    Ok(Json(account))
}

/// Withdraw from an account.
///
/// # Validation
///
/// - Amount must be positive
/// - Account must have sufficient balance (422 `insufficient_funds` otherwise)
pub async fn withdraw(
    State(state): State<AppState>,
    AppPath(account_id): AppPath<i32>,
    AppJson(request): AppJson<WithdrawalRequest>,
) -> Result<Json<Account>, AppError> {
    let account = state.accounts.withdraw(account_id, request.amount).await?;

    Ok(Json(account))
}

/// Transfer money between accounts.
///
/// # Atomicity
///
/// Both accounts are updated in a single database transaction.
/// Either both succeed or both fail.
///
/// # Response (200)
///
/// ```json
/// {
///   "from": { "id": 1, "accountType": "checking", "balance": "500.00" },
///   "to": { "id": 2, "accountType": "savings", "balance": "5500.00" }
/// }
/// ```
pub async fn transfer(
    State(state): State<AppState>,
    AppJson(request): AppJson<TransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    let result = state.accounts.transfer(request).await?;

    Ok(Json(result))
}
