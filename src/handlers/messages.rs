//! Internal messaging between associates and the back office. Associate
//! messages land in the shared admin inbox (recipient is NULL); admin replies
//! target a specific associate. Both directions push a websocket event.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::websocket::{broadcast_event, Audience};
use crate::AppState;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: Option<String>,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

fn db_error(e: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Database error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Database error"})),
    )
}

fn message_from_row(row: &sqlx::postgres::PgRow) -> MessageResponse {
    MessageResponse {
        id: row.get::<Uuid, _>("id").to_string(),
        sender_id: row.get::<Uuid, _>("sender_id").to_string(),
        recipient_id: row
            .get::<Option<Uuid>, _>("recipient_id")
            .map(|id| id.to_string()),
        body: row.get("body"),
        read: row.get("read"),
        created_at: row.get("created_at"),
    }
}

const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, body, read, created_at";

async fn insert_message(
    state: &AppState,
    sender_id: Uuid,
    recipient_id: Option<Uuid>,
    body: &str,
) -> Result<MessageResponse, sqlx::Error> {
    let message_id = Uuid::new_v4();
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO messages (id, sender_id, recipient_id, body, read, created_at)
        VALUES ($1, $2, $3, $4, FALSE, NOW())
        RETURNING {}
        "#,
        MESSAGE_COLUMNS
    ))
    .bind(message_id)
    .bind(sender_id)
    .bind(recipient_id)
    .bind(body)
    .fetch_one(&*state.db_pool)
    .await?;

    Ok(message_from_row(&row))
}

/// Associate thread: everything the caller sent plus everything addressed
/// to them.
pub async fn my_messages(
    Extension(auth): Extension<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<MessageResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM messages WHERE sender_id = $1 OR recipient_id = $1 ORDER BY created_at",
        MESSAGE_COLUMNS
    ))
    .bind(auth.user_id)
    .fetch_all(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok(Json(rows.iter().map(message_from_row).collect()))
}

/// Associate sends into the shared admin inbox.
pub async fn send_message(
    Extension(auth): Extension<AuthUser>,
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<serde_json::Value>)> {
    let body = payload.body.trim();
    if body.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Message body is required"})),
        ));
    }

    let message = insert_message(&state, auth.user_id, None, body)
        .await
        .map_err(db_error)?;

    broadcast_event(
        &state.broadcast_tx,
        Audience::Admins,
        "message_received",
        serde_json::json!({
            "id": message.id,
            "sender_id": message.sender_id,
        }),
    );

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn mark_message_read(
    Extension(auth): Extension<AuthUser>,
    Path(message_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let message_id = Uuid::parse_str(&message_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid message id: {}", e)})),
        )
    })?;

    // Admins may mark anything; associates only messages addressed to them.
    let result = if auth.is_admin() {
        sqlx::query("UPDATE messages SET read = TRUE WHERE id = $1")
            .bind(message_id)
            .execute(&*state.db_pool)
            .await
    } else {
        sqlx::query("UPDATE messages SET read = TRUE WHERE id = $1 AND recipient_id = $2")
            .bind(message_id)
            .bind(auth.user_id)
            .execute(&*state.db_pool)
            .await
    }
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Message not found"})),
        ));
    }

    Ok(Json(serde_json::json!({
        "id": message_id.to_string(),
        "read": true
    })))
}

/// Admin view of the thread with one associate. The shared inbox shows the
/// associate's outbound messages and any admin replies to them.
pub async fn admin_thread(
    Path(associate_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<MessageResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let associate_id = Uuid::parse_str(&associate_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid associate id: {}", e)})),
        )
    })?;

    let rows = sqlx::query(&format!(
        "SELECT {} FROM messages WHERE sender_id = $1 OR recipient_id = $1 ORDER BY created_at",
        MESSAGE_COLUMNS
    ))
    .bind(associate_id)
    .fetch_all(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok(Json(rows.iter().map(message_from_row).collect()))
}

/// Admin reply addressed to a specific associate.
pub async fn admin_send_message(
    Extension(auth): Extension<AuthUser>,
    Path(associate_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<serde_json::Value>)> {
    let associate_id = Uuid::parse_str(&associate_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid associate id: {}", e)})),
        )
    })?;

    let body = payload.body.trim();
    if body.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Message body is required"})),
        ));
    }

    let recipient_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1 AND role = 'associate')",
    )
    .bind(associate_id)
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    if !recipient_exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Associate not found"})),
        ));
    }

    let message = insert_message(&state, auth.user_id, Some(associate_id), body)
        .await
        .map_err(db_error)?;

    broadcast_event(
        &state.broadcast_tx,
        Audience::User(associate_id),
        "message_received",
        serde_json::json!({
            "id": message.id,
            "sender_id": message.sender_id,
        }),
    );

    Ok((StatusCode::CREATED, Json(message)))
}
