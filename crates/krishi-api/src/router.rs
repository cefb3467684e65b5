//! Axum router construction for the command API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for the dashboard.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the API server.
///
/// CORS allows any origin; the dashboard is served separately.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/events", get(ws::ws_events))
        // Reads
        .route("/api/state", get(handlers::get_state))
        .route("/api/plots", get(handlers::list_plots))
        // Plot commands
        .route("/api/plots/{id}/plant", post(handlers::plant))
        .route("/api/plots/{id}/water", post(handlers::water))
        .route("/api/plots/{id}/fertilize", post(handlers::fertilize))
        .route("/api/plots/{id}/harvest", post(handlers::harvest))
        // Progression
        .route("/api/quizzes/{id}/submit", post(handlers::submit_quiz))
        .route("/api/achievements/evaluate", post(handlers::evaluate_achievements))
        .route("/api/missions/{id}/complete", post(handlers::complete_mission))
        .route("/api/missions/{id}/photo", post(handlers::submit_photo))
        // Store
        .route("/api/store/purchase", post(handlers::purchase))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
