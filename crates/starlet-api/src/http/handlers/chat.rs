//! POST /chat - run one conversation turn.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    /// Defaults to the runner's default user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Omit to get a synthesised session.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub user_id: String,
    pub session_id: String,
    pub status: &'static str,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let runner = state.runner()?;
    let user_id = request
        .user_id
        .unwrap_or_else(|| runner.default_user_id().to_string());

    tracing::info!(user_id = %user_id, session_id = ?request.session_id, "Chat request");

    let reply = runner
        .run_agent(&request.prompt, Some(&user_id), request.session_id.as_deref())
        .await
        .map_err(AppError::Chat)?;

    Ok(Json(ChatResponse {
        response: reply.response,
        user_id,
        session_id: reply.session_id,
        status: "success",
    }))
}
