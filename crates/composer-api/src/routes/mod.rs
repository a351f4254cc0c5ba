//! API route handlers

pub mod compose;
pub mod health;
pub mod tokens;

use axum::{routing::get, Router};

use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/route", compose::router())
        .nest("/tokens", tokens::router())
        .with_state(state)
}
