pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::deck::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Deck API
        .route("/api/v1/decks/plan", post(handlers::handle_plan))
        .route("/api/v1/decks/build", post(handlers::handle_build))
        .with_state(state)
}
