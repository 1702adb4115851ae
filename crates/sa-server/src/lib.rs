//! ShopAssist HTTP API server (Axum).
//!
//! Exposes the flow decision engine as a webhook-shaped endpoint, plus
//! session lookup/reset and health.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with all routes.
pub fn app() -> Router {
    let state = AppState::new();
    app_with_state(state)
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::decision_routes())
        .merge(routes::session_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests;
