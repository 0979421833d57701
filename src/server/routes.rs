//! Router configuration for the review API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Entities
        .route(
            "/api/entities",
            get(handlers::list_entities).post(handlers::create_entity),
        )
        .route(
            "/api/entities/:entity_id",
            get(handlers::get_entity).delete(handlers::delete_entity),
        )
        .route(
            "/api/entities/:entity_id/reviews",
            get(handlers::entity_reviews),
        )
        // Reviews
        .route("/api/reviews", post(handlers::create_review))
        .route(
            "/api/reviews/:review_id",
            get(handlers::get_review).delete(handlers::delete_review),
        )
        .route("/api/reviews/:review_id/vote", post(handlers::vote_review))
        // Batch summaries
        .route("/api/summaries/run", get(handlers::run_summaries))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
