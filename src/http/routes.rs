use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Call session control
        .route("/sessions/start", post(handlers::start_session))
        .route("/sessions/:session_id/stop", post(handlers::stop_session))
        .route("/sessions/:session_id", get(handlers::session_status))
        // Feedback re-scoring
        .route("/feedback", post(handlers::generate_feedback))
        // Question-set generation
        .route("/interviews/generate", post(handlers::generate_questions))
        // Interview queries
        .route("/interviews", get(handlers::list_interviews))
        .route("/interviews/latest", get(handlers::latest_interviews))
        .route("/interviews/:interview_id", get(handlers::get_interview))
        .route(
            "/interviews/:interview_id/feedback",
            get(handlers::get_interview_feedback),
        )
        // Browser UI calls these cross-origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
