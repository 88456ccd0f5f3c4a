//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Stateless analysis
        .route("/upload", post(handlers::upload))
        .route("/analyze", post(handlers::analyze))
        .route("/rank-schedule", post(handlers::rank_schedule))
        // Session hand-off
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/{session_id}/search", post(handlers::search_session))
        .route("/sessions/{session_id}/analyze", post(handlers::analyze_session))
        .route(
            "/sessions/{session_id}/rank-schedule",
            post(handlers::session_rank_schedule),
        )
        .route("/sessions/{session_id}/report", get(handlers::get_report))
        .route("/sessions/{session_id}/export.csv", get(handlers::export_csv));

    let body_limit = state.config.server.body_limit_bytes();

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::SessionRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn SessionRepository>;
        let state = AppState::new(repo, AppConfig::default());
        let _router = create_router(state);
    }
}
