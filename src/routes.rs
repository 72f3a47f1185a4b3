//! HTTP route table.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/accounts", get(handlers::accounts::list_accounts))
        .route(
            "/accounts/transfer",
            post(handlers::transactions::transfer),
        )
        .route("/accounts/{id}", get(handlers::accounts::get_account))
        .route(
            "/accounts/{id}/deposit",
            post(handlers::transactions::deposit),
        )
        .route(
            "/accounts/{id}/withdrawal",
            post(handlers::transactions::withdraw),
        )
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
