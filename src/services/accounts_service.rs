//! Accounts service - Validation and orchestration for balance mutations.
//!
//! This service handles:
//! - Amount validation (positive, capped for deposits and transfers)
//! - Existence and sufficient-funds checks
//! - Fault injection on account listing
//!
//! Validation failures are returned before any storage call. The repository
//! re-checks funds atomically, so the pre-check here only produces the
//! early, friendly error.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    error::AppError,
    models::{
        account::{Account, AccountWithDetails},
        transaction::{TransferRequest, TransferResponse},
    },
    repository::{AccountsRepository, MONEY_SCALE},
    services::fault_injection::FaultInjector,
};

/// Largest amount accepted by a single deposit or transfer.
pub const MAX_DEPOSIT_AMOUNT: Decimal = dec!(10000);

const WEB_DEPOSIT: &str = "Web deposit";
const WEB_WITHDRAWAL: &str = "Web withdrawal";

#[derive(Clone)]
pub struct AccountsService {
    repository: Arc<dyn AccountsRepository>,
    fault_injector: Arc<dyn FaultInjector>,
}

impl AccountsService {
    pub fn with_fault_injector(
        repository: Arc<dyn AccountsRepository>,
        fault_injector: Arc<dyn FaultInjector>,
    ) -> Self {
        Self {
            repository,
            fault_injector,
        }
    }

    pub fn repository(&self) -> &dyn AccountsRepository {
        self.repository.as_ref()
    }

    /// List all accounts.
    ///
    /// # Errors
    ///
    /// - `TransientFailure`: The fault injector fired
    /// - `Database`: Storage error
    pub async fn get_accounts(&self) -> Result<Vec<Account>, AppError> {
        if self.fault_injector.should_fail() {
            tracing::warn!("Injected failure while listing accounts");
            return Err(AppError::TransientFailure(
                "Random failure occurred while fetching accounts".to_string(),
            ));
        }

        self.repository.get_accounts().await
    }

    /// Fetch an account and its ledger, most recent entry first.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound`: Account doesn't exist
    pub async fn get_account_details(
        &self,
        account_id: i32,
    ) -> Result<AccountWithDetails, AppError> {
        let account = self
            .repository
            .get_account(account_id)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let transactions = self.repository.get_account_transactions(account_id).await?;

        Ok(AccountWithDetails {
            account,
            transactions,
        })
    }

    /// Add money to an account.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: Amount is zero, negative or finer than a cent
    /// - `LimitExceeded`: Amount is above `MAX_DEPOSIT_AMOUNT`
    /// - `AccountNotFound`: Account doesn't exist
    pub async fn deposit(&self, account_id: i32, amount: Decimal) -> Result<Account, AppError> {
        ensure_valid_amount(amount, "Deposit")?;
        ensure_within_limit(amount)?;

        let account = self
            .repository
            .deposit(account_id, amount, WEB_DEPOSIT)
            .await?;

        tracing::info!(account_id, %amount, balance = %account.balance, "Deposit applied");
        Ok(account)
    }

    /// Remove money from an account.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: Amount is zero, negative or finer than a cent
    /// - `AccountNotFound`: Account doesn't exist
    /// - `InsufficientFunds`: Balance is lower than the amount
    pub async fn withdraw(&self, account_id: i32, amount: Decimal) -> Result<Account, AppError> {
        ensure_valid_amount(amount, "Withdrawal")?;

        let current = self
            .repository
            .get_account(account_id)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        if current.balance < amount {
            tracing::warn!(
                account_id,
                %amount,
                balance = %current.balance,
                "Withdrawal rejected"
            );
            return Err(AppError::InsufficientFunds);
        }

        let account = self
            .repository
            .withdraw(account_id, amount, WEB_WITHDRAWAL)
            .await?;

        tracing::info!(account_id, %amount, balance = %account.balance, "Withdrawal applied");
        Ok(account)
    }

    /// Move money between two accounts in one atomic step.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: Amount is zero, negative or finer than a cent
    /// - `LimitExceeded`: Amount is above `MAX_DEPOSIT_AMOUNT`
    /// - `InvalidRequest`: Source and destination are the same account
    /// - `AccountNotFound`: Either account doesn't exist
    /// - `InsufficientFunds`: Source balance is lower than the amount
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferResponse, AppError> {
        ensure_valid_amount(request.amount, "Transfer")?;
        ensure_within_limit(request.amount)?;

        if request.from_account_id == request.to_account_id {
            return Err(AppError::InvalidRequest(
                "Cannot transfer to same account".to_string(),
            ));
        }

        let source = self
            .repository
            .get_account(request.from_account_id)
            .await?
            .ok_or(AppError::AccountNotFound)?;
        if self
            .repository
            .get_account(request.to_account_id)
            .await?
            .is_none()
        {
            return Err(AppError::AccountNotFound);
        }
        if source.balance < request.amount {
            tracing::warn!(
                from = request.from_account_id,
                amount = %request.amount,
                balance = %source.balance,
                "Transfer rejected"
            );
            return Err(AppError::InsufficientFunds);
        }

        let (from, to) = self
            .repository
            .transfer(
                request.from_account_id,
                request.to_account_id,
                request.amount,
                request.description.as_deref(),
            )
            .await?;

        tracing::info!(
            from = from.id,
            to = to.id,
            amount = %request.amount,
            "Transfer applied"
        );
        Ok(TransferResponse { from, to })
    }
}

/// Amounts must be positive and expressible in whole cents.
fn ensure_valid_amount(amount: Decimal, operation: &str) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount(format!(
            "{operation} amount must be greater than zero"
        )));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::InvalidAmount(format!(
            "{operation} amount must have at most {MONEY_SCALE} decimal places"
        )));
    }
    Ok(())
}

fn ensure_within_limit(amount: Decimal) -> Result<(), AppError> {
    if amount > MAX_DEPOSIT_AMOUNT {
        return Err(AppError::LimitExceeded {
            limit: MAX_DEPOSIT_AMOUNT,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repository::InMemoryAccountsRepository, services::fault_injection::NoFaults};
    use rstest::rstest;

    async fn seeded_service() -> AccountsService {
        let repository = InMemoryAccountsRepository::new();
        repository.wipe_and_seed().await.unwrap();
        AccountsService::with_fault_injector(Arc::new(repository), Arc::new(NoFaults))
    }

    async fn balance_of(service: &AccountsService, account_id: i32) -> Decimal {
        service
            .get_account_details(account_id)
            .await
            .unwrap()
            .account
            .balance
    }

    fn transfer(from: i32, to: i32, amount: Decimal) -> TransferRequest {
        TransferRequest {
            from_account_id: from,
            to_account_id: to,
            amount,
            description: Some("Test transfer".to_string()),
        }
    }

    #[tokio::test]
    async fn get_accounts_returns_all_seeded_accounts() {
        let service = seeded_service().await;

        let accounts = service.get_accounts().await.unwrap();

        assert_eq!(accounts.len(), 4);
    }

    #[tokio::test]
    async fn get_accounts_fails_when_fault_fires() {
        let repository = Arc::new(InMemoryAccountsRepository::new());
        repository.wipe_and_seed().await.unwrap();
        let service = AccountsService::with_fault_injector(repository, Arc::new(|| true));

        let err = service.get_accounts().await.unwrap_err();

        assert!(matches!(err, AppError::TransientFailure(_)));
    }

    #[tokio::test]
    async fn account_details_include_balance_and_history() {
        let service = seeded_service().await;

        let details = service.get_account_details(1).await.unwrap();

        assert_eq!(details.account.id, 1);
        assert_eq!(details.account.balance, dec!(1000));
        assert_eq!(details.transactions.len(), 1);
    }

    #[tokio::test]
    async fn account_details_for_unknown_account_is_not_found() {
        let service = seeded_service().await;

        let err = service.get_account_details(999).await.unwrap_err();

        assert!(matches!(err, AppError::AccountNotFound));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-0.01))]
    #[case(dec!(-100))]
    #[tokio::test]
    async fn non_positive_amounts_are_invalid(#[case] amount: Decimal) {
        let service = seeded_service().await;

        let deposit = service.deposit(1, amount).await.unwrap_err();
        let withdrawal = service.withdraw(1, amount).await.unwrap_err();

        assert!(matches!(
            deposit,
            AppError::InvalidAmount(ref msg) if msg.contains("greater than zero")
        ));
        assert!(matches!(withdrawal, AppError::InvalidAmount(_)));
        assert_eq!(balance_of(&service, 1).await, dec!(1000));
    }

    #[rstest]
    #[case(dec!(0.005))]
    #[case(dec!(0.001))]
    #[case(dec!(12.345))]
    #[tokio::test]
    async fn sub_cent_amounts_are_invalid(#[case] amount: Decimal) {
        let service = seeded_service().await;

        let deposit = service.deposit(1, amount).await.unwrap_err();
        let withdrawal = service.withdraw(3, amount).await.unwrap_err();
        let moved = service.transfer(transfer(1, 2, amount)).await.unwrap_err();

        assert!(matches!(
            deposit,
            AppError::InvalidAmount(ref msg) if msg.contains("decimal places")
        ));
        assert!(matches!(withdrawal, AppError::InvalidAmount(_)));
        assert!(matches!(moved, AppError::InvalidAmount(_)));
        assert_eq!(balance_of(&service, 1).await, dec!(1000));
        assert_eq!(balance_of(&service, 3).await, dec!(500));
        assert_eq!(service.get_account_details(1).await.unwrap().transactions.len(), 1);
    }

    #[tokio::test]
    async fn trailing_zeros_beyond_cents_are_accepted() {
        let service = seeded_service().await;

        let account = service.deposit(1, dec!(0.0100)).await.unwrap();

        assert_eq!(account.balance, dec!(1000.01));
    }

    #[rstest]
    #[case(dec!(10000.01))]
    #[case(dec!(10001))]
    #[case(dec!(1000000))]
    #[tokio::test]
    async fn deposits_above_the_cap_are_rejected(#[case] amount: Decimal) {
        let service = seeded_service().await;

        let err = service.deposit(1, amount).await.unwrap_err();

        assert!(matches!(err, AppError::LimitExceeded { limit } if limit == MAX_DEPOSIT_AMOUNT));
        assert_eq!(balance_of(&service, 1).await, dec!(1000));
    }

    #[tokio::test]
    async fn deposit_at_the_cap_succeeds() {
        let service = seeded_service().await;

        let account = service.deposit(1, dec!(10000)).await.unwrap();

        assert_eq!(account.balance, dec!(11000));
    }

    #[tokio::test]
    async fn deposit_to_unknown_account_is_not_found() {
        let service = seeded_service().await;

        let err = service.deposit(999, dec!(10)).await.unwrap_err();

        assert!(matches!(err, AppError::AccountNotFound));
    }

    #[rstest]
    #[case(3, dec!(500.01))]
    #[case(3, dec!(1000))]
    #[case(1, dec!(1000.50))]
    #[tokio::test]
    async fn withdrawals_beyond_balance_are_insufficient(
        #[case] account_id: i32,
        #[case] amount: Decimal,
    ) {
        let service = seeded_service().await;
        let before = balance_of(&service, account_id).await;

        let err = service.withdraw(account_id, amount).await.unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds));
        assert_eq!(balance_of(&service, account_id).await, before);
    }

    #[tokio::test]
    async fn withdrawing_the_whole_balance_leaves_zero() {
        let service = seeded_service().await;

        let account = service.withdraw(3, dec!(500)).await.unwrap();

        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn withdraw_from_unknown_account_is_not_found() {
        let service = seeded_service().await;

        let err = service.withdraw(999, dec!(100)).await.unwrap_err();

        assert!(matches!(err, AppError::AccountNotFound));
    }

    #[rstest]
    #[case(dec!(0.01))]
    #[case(dec!(250))]
    #[case(dec!(5000))]
    #[tokio::test]
    async fn deposit_then_withdraw_restores_balance(#[case] amount: Decimal) {
        let service = seeded_service().await;

        service.deposit(2, amount).await.unwrap();
        let account = service.withdraw(2, amount).await.unwrap();

        assert_eq!(account.balance, dec!(5000));
    }

    #[tokio::test]
    async fn every_mutation_adds_one_ledger_entry() {
        let service = seeded_service().await;

        service.deposit(1, dec!(10)).await.unwrap();
        service.withdraw(1, dec!(5)).await.unwrap();
        service.transfer(transfer(1, 2, dec!(1))).await.unwrap();

        let details = service.get_account_details(1).await.unwrap();
        assert_eq!(details.transactions.len(), 4);
    }

    #[rstest]
    #[case(1, 2, dec!(500))]
    #[case(4, 3, dec!(10000))]
    #[case(2, 1, dec!(0.01))]
    #[tokio::test]
    async fn transfer_moves_funds(#[case] from: i32, #[case] to: i32, #[case] amount: Decimal) {
        let service = seeded_service().await;
        let from_before = balance_of(&service, from).await;
        let to_before = balance_of(&service, to).await;

        let result = service.transfer(transfer(from, to, amount)).await.unwrap();

        assert_eq!(result.from.balance, from_before - amount);
        assert_eq!(result.to.balance, to_before + amount);
        assert_eq!(balance_of(&service, from).await, from_before - amount);
        assert_eq!(balance_of(&service, to).await, to_before + amount);
    }

    #[tokio::test]
    async fn transfer_with_insufficient_funds_changes_nothing() {
        let service = seeded_service().await;

        let err = service.transfer(transfer(3, 2, dec!(1000))).await.unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds));
        assert_eq!(balance_of(&service, 3).await, dec!(500));
        assert_eq!(balance_of(&service, 2).await, dec!(5000));
    }

    #[rstest]
    #[case(999, 2)]
    #[case(1, 999)]
    #[tokio::test]
    async fn transfer_with_unknown_account_is_not_found(#[case] from: i32, #[case] to: i32) {
        let service = seeded_service().await;

        let err = service.transfer(transfer(from, to, dec!(100))).await.unwrap_err();

        assert!(matches!(err, AppError::AccountNotFound));
        assert_eq!(balance_of(&service, 1).await, dec!(1000));
        assert_eq!(balance_of(&service, 2).await, dec!(5000));
    }

    #[tokio::test]
    async fn transfer_to_the_same_account_is_rejected() {
        let service = seeded_service().await;

        let err = service.transfer(transfer(1, 1, dec!(1))).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn transfer_validates_amount_before_lookup() {
        let service = seeded_service().await;

        let zero = service.transfer(transfer(999, 998, dec!(0))).await.unwrap_err();
        let huge = service.transfer(transfer(999, 998, dec!(10000.01))).await.unwrap_err();

        assert!(matches!(zero, AppError::InvalidAmount(_)));
        assert!(matches!(huge, AppError::LimitExceeded { .. }));
    }

    #[tokio::test]
    async fn demo_scenario() {
        let service = seeded_service().await;

        let account = service.deposit(1, dec!(500)).await.unwrap();
        assert_eq!(account.balance, dec!(1500));

        let err = service.withdraw(3, dec!(1000)).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientFunds));

        let result = service.transfer(transfer(1, 2, dec!(500))).await.unwrap();
        assert_eq!(result.from.balance, dec!(1000));
        assert_eq!(result.to.balance, dec!(5500));
    }
}
