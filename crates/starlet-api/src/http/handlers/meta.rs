//! Service descriptor and health check.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET / - static service descriptor.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let display = state.persona.display_name();
    Json(json!({
        "message": format!("{display} Agent API"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": format!("Chat with {display} using Gemini"),
        "endpoints": {
            "chat": "/chat",
            "health": "/health",
            "sessions": "/sessions/{user_id}",
        }
    }))
}

/// GET /health - liveness only; does not check the runner.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "agent": format!("{} Agent", state.persona.display_name()),
        "service": "running",
    }))
}
