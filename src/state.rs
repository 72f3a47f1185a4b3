//! Shared state handed to every handler through axum's `State` extractor.

use std::sync::Arc;

use crate::{
    repository::AccountsRepository,
    services::{accounts_service::AccountsService, fault_injection::FaultInjector},
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountsService,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn AccountsRepository>,
        fault_injector: Arc<dyn FaultInjector>,
    ) -> Self {
        Self {
            accounts: AccountsService::with_fault_injector(repository, fault_injector),
        }
    }
}
