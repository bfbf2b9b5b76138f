//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET    /sessions/{user_id}              - List a user's sessions
//! - DELETE /sessions/{user_id}/{session_id} - Delete a session and its history

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use starlet_types::session::SessionInfo;

use crate::http::error::AppError;
use crate::state::AppState;

pub async fn list_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SessionInfo>, AppError> {
    let runner = state.runner()?;
    Ok(Json(runner.registry().session_info(&user_id).await))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path((user_id, session_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let runner = state.runner()?;
    runner.registry().delete_session(&user_id, &session_id).await?;

    Ok(Json(json!({
        "message": format!("Session {session_id} deleted for user {user_id}"),
        "user_id": user_id,
        "session_id": session_id,
        "deleted": true,
    })))
}
