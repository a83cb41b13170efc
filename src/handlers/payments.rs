//! Mocked checkout. No processor is wired up; the endpoint builds a
//! WhatsApp deep link with a pre-filled message and the frontend opens it.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use crate::services::payment::{checkout_link, checkout_message, CheckoutKind};
use crate::AppState;

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub kind: CheckoutKind,
    pub reference: String,
    pub amount: f64,
    /// Display name, used for product checkouts.
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub message: String,
}

pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, (StatusCode, Json<serde_json::Value>)> {
    if payload.reference.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Reference is required"})),
        ));
    }
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Amount must be a positive number"})),
        ));
    }

    let message = checkout_message(
        payload.kind,
        payload.reference.trim(),
        payload.amount,
        payload.name.as_deref(),
    );
    let url = checkout_link(&state.config.whatsapp_number, &message);

    Ok(Json(CheckoutResponse { url, message }))
}
