use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{header::AUTHORIZATION, StatusCode},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::models::Role;
use crate::AppState;

/// Who a realtime event is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Audience {
    /// A single account (e.g. a new message for that inbox).
    User(Uuid),
    /// Every connected admin (e.g. a new contact request).
    Admins,
}

pub type BroadcastChannel = broadcast::Sender<(Audience, String)>;

#[derive(Deserialize)]
pub struct WebSocketQuery {
    token: Option<String>,
}

pub fn create_broadcast_channel() -> BroadcastChannel {
    broadcast::channel(100).0
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WebSocketQuery>,
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Response, StatusCode> {
    // Token comes from the query string (browsers cannot set headers on WS)
    // or from the Authorization header.
    let token = query.token.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).to_string())
    });

    let token = token.ok_or_else(|| {
        tracing::warn!("WebSocket connection attempt without token");
        StatusCode::UNAUTHORIZED
    })?;

    let decoding_key = DecodingKey::from_secret(state.config.jwt_secret.as_ref());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(&token, &decoding_key, &validation).map_err(|e| {
        tracing::warn!("WebSocket token validation failed: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    let user_id = Uuid::parse_str(&token_data.claims.user_id).map_err(|e| {
        tracing::warn!("WebSocket invalid user_id in token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    // Role from the profiles row, not the token, so demotion takes effect.
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&*state.db_pool)
        .await
        .map_err(|e| {
            tracing::error!("WebSocket database error checking profile: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let role = match role.as_deref().and_then(Role::from_str) {
        Some(r) => r,
        None => {
            tracing::warn!("WebSocket connection attempt for unknown profile: {}", user_id);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    tracing::info!("WebSocket connection authenticated for user: {}", user_id);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, role)))
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: Uuid, role: Role) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.broadcast_tx.subscribe();

    let mut send_task = tokio::spawn(async move {
        while let Ok((audience, msg)) = rx.recv().await {
            let deliver = match audience {
                Audience::User(target) => target == user_id,
                Audience::Admins => role == Role::Admin,
            };
            if !deliver {
                continue;
            }
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };
}

/// Broadcast a realtime event to an audience. Lagging or absent receivers
/// are dropped silently; realtime is best-effort on top of polling.
pub fn broadcast_event(
    channel: &BroadcastChannel,
    audience: Audience,
    event_type: &str,
    data: serde_json::Value,
) {
    let message = serde_json::json!({"type": event_type, "data": data}).to_string();
    let _ = channel.send((audience, message));
}
