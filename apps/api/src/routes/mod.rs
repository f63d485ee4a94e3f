pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::events::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/events", get(handlers::handle_list_events))
        .route("/api/v1/events/search", get(handlers::handle_search_events))
        .route(
            "/api/v1/events/featured",
            get(handlers::handle_featured_events),
        )
        .route("/api/v1/events/:id", get(handlers::handle_get_event))
        .route(
            "/api/v1/events/:id/save",
            post(handlers::handle_toggle_save),
        )
        .route(
            "/api/v1/badges/trending",
            get(handlers::handle_trending_badges),
        )
        .with_state(state)
}
