//! Public chat endpoint. Forwards the visitor's message to the external
//! webhook and degrades to a canned reply when the upstream is down, so the
//! widget always gets a 200 with something to render.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use crate::services::chatbot::FALLBACK_REPLY;
use crate::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<serde_json::Value>)> {
    if payload.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Message is required"})),
        ));
    }
    if payload.session_id.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Session id is required"})),
        ));
    }

    let reply = match state
        .chat
        .send(payload.message.trim(), payload.session_id.trim(), payload.metadata)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Chat webhook unavailable: {}", e);
            FALLBACK_REPLY.to_string()
        }
    };

    Ok(Json(ChatResponse { reply }))
}
