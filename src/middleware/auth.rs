use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    /// Role as currently stored in profiles, not as claimed by the token.
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Paths the public site uses without a session: landing page, health,
/// login, contact form, chat widget, catalog and the checkout stub.
/// The websocket endpoint authenticates its own token in the query string.
fn is_public_path(path: &str) -> bool {
    path == "/"
        || path == "/health"
        || path == "/ws"
        || path == "/api/auth/login"
        || path == "/api/contact-requests"
        || path == "/api/chat"
        || path == "/api/payments/checkout"
        || path.starts_with("/api/content/")
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path();
    if is_public_path(path) {
        return Ok(next.run(req).await);
    }

    /// 401 with a stable code so clients only log out when the server
    /// explicitly declines the session (not on network errors).
    fn auth_declined_response() -> Response {
        let body = serde_json::json!({
            "code": "VERTEX_AUTH_DECLINED",
            "message": "Authentication required or session invalid"
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }

    let auth_header = match req.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        Some(h) => h,
        None => return Ok(auth_declined_response()),
    };

    if !auth_header.starts_with("Bearer ") {
        return Ok(auth_declined_response());
    }

    let token = &auth_header[7..];

    let decoding_key = DecodingKey::from_secret(state.config.jwt_secret.as_ref());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(d) => d,
        Err(_) => return Ok(auth_declined_response()),
    };

    let claims = token_data.claims;

    let user_id = match Uuid::parse_str(&claims.user_id) {
        Ok(u) => u,
        Err(_) => return Ok(auth_declined_response()),
    };

    // The profiles row is the source of truth for the role; a deleted or
    // demoted account loses access even with an unexpired token.
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&*state.db_pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let role = match role.as_deref().and_then(Role::from_str) {
        Some(r) => r,
        None => return Ok(auth_declined_response()),
    };

    // The admin surface requires an admin account.
    if path.starts_with("/api/admin/") && role != Role::Admin {
        let body = serde_json::json!({
            "code": "VERTEX_FORBIDDEN",
            "message": "Insufficient permissions"
        });
        return Ok((StatusCode::FORBIDDEN, Json(body)).into_response());
    }

    let auth_user = AuthUser {
        user_id,
        email: claims.email,
        role,
    };
    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}
