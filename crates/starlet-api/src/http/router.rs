//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin, method and header) and request tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::meta::root))
        .route("/health", get(handlers::meta::health))
        .route("/chat", post(handlers::chat::chat))
        .route("/sessions/{user_id}", get(handlers::session::list_sessions))
        .route(
            "/sessions/{user_id}/{session_id}",
            delete(handlers::session::delete_session),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
