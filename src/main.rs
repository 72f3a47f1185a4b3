//! Simple ATM - Main Application Entry Point
//!
//! A small REST API for bank accounts: list accounts, view an account with its ledger, deposit, withdraw and transfer between accounts.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries), or an in-memory store
//! - **Money**: `rust_decimal::Decimal`, stored as `NUMERIC(18,2)`
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the storage backend (PostgreSQL pool or in-memory store)
//! 3. Wipe and seed the demo accounts, or just make sure the tables exist
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod models;
mod repository;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    config::{Config, StorageBackend},
    error::AppError,
    repository::{AccountsRepository, InMemoryAccountsRepository, PgAccountsRepository},
    services::fault_injection,
    state::AppState,
};

async fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn AccountsRepository>> {
    let repository: Arc<dyn AccountsRepository> = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or(config::ConfigError::MissingDatabaseUrl)?;
            let pool = db::create_pool(database_url, config.database_max_connections).await?;
            tracing::info!("Database pool created");
            Arc::new(PgAccountsRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemoryAccountsRepository::new())
        }
    };

    Ok(repository)
}

async fn prepare_storage(
    config: &Config,
    repository: &dyn AccountsRepository,
) -> Result<(), AppError> {
    if config.wipe_and_seed {
        tracing::warn!("WIPE_AND_SEED is enabled; dropping and reseeding all accounts");
        repository.wipe_and_seed().await
    } else {
        repository.ensure_schema().await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(storage = ?config.storage, "Configuration loaded");

    let repository = build_repository(&config).await?;

    prepare_storage(&config, repository.as_ref()).await?;
    tracing::info!("Storage ready");

    let fault_injector = fault_injection::from_failure_rate(config.listing_failure_rate);
    tracing::info!(
        failure_rate = config.listing_failure_rate,
        "Fault injection configured for account listing"
    );

    let app = routes::build_router(AppState::new(repository, fault_injector));

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
