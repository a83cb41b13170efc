//! Public contact form intake plus the admin inbox over it. The public
//! endpoint is rate limited per IP and runs a spam filter before anything
//! touches the database.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::websocket::{broadcast_event, Audience};
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub phone: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ContactRequestResponse {
    pub id: String,
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub phone: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

const SPAM_WORDS: &[&str] = &["casino", "viagra", "lottery", "prize", "crypto", "investment"];

pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    // Counted in characters, not bytes: accented names are multi-byte.
    let length = trimmed.chars().count();
    if !(2..=100).contains(&length) {
        return Err("Name must be between 2 and 100 characters");
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace())
    {
        return Err("Name contains invalid characters");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 8 {
        return Err("Phone number is too short");
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<(), &'static str> {
    let trimmed = message.trim();
    let length = trimmed.chars().count();
    if length < 10 {
        return Err("Message is too short");
    }
    if length > 1000 {
        return Err("Message is too long");
    }
    let lower = trimmed.to_lowercase();
    if SPAM_WORDS.iter().any(|w| lower.contains(w)) {
        return Err("Message was rejected");
    }
    Ok(())
}

pub fn validate_contact(payload: &CreateContactRequest) -> Result<(), &'static str> {
    validate_name(&payload.name)?;
    if payload.country.trim().len() < 2 {
        return Err("Country is required");
    }
    if payload.country_code.trim().is_empty() {
        return Err("Country code is required");
    }
    validate_phone(&payload.phone)?;
    validate_message(&payload.message)
}

fn db_error(e: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Database error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Database error"})),
    )
}

fn request_from_row(row: &sqlx::postgres::PgRow) -> ContactRequestResponse {
    ContactRequestResponse {
        id: row.get::<Uuid, _>("id").to_string(),
        name: row.get("name"),
        country: row.get("country"),
        country_code: row.get("country_code"),
        phone: row.get("phone"),
        message: row.get("message"),
        read: row.get("read"),
        created_at: row.get("created_at"),
    }
}

/// Public submission endpoint. Sits behind the per-IP rate limiter.
pub async fn create_contact_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, Json<serde_json::Value>)> {
    if let Err(reason) = validate_contact(&payload) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": reason})),
        ));
    }

    let request_id = Uuid::new_v4();
    let row = sqlx::query(
        r#"
        INSERT INTO contact_requests (id, name, country, country_code, phone, message, read, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW())
        RETURNING id, name, country, country_code, phone, message, read, created_at
        "#,
    )
    .bind(request_id)
    .bind(payload.name.trim())
    .bind(payload.country.trim())
    .bind(payload.country_code.trim())
    .bind(payload.phone.trim())
    .bind(payload.message.trim())
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    let response = request_from_row(&row);
    broadcast_event(
        &state.broadcast_tx,
        Audience::Admins,
        "contact_request_created",
        serde_json::json!({
            "id": response.id,
            "name": response.name,
            "country": response.country,
        }),
    );

    tracing::info!("Contact request received from {}", response.country);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": response.id,
            "message": "Contact request submitted successfully"
        })),
    ))
}

pub async fn list_contact_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactRequestResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query(
        "SELECT id, name, country, country_code, phone, message, read, created_at
         FROM contact_requests ORDER BY created_at DESC",
    )
    .fetch_all(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok(Json(rows.iter().map(request_from_row).collect()))
}

pub async fn mark_contact_request_read(
    Path(request_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let request_id = Uuid::parse_str(&request_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid request id: {}", e)})),
        )
    })?;

    let result = sqlx::query("UPDATE contact_requests SET read = TRUE WHERE id = $1")
        .bind(request_id)
        .execute(&*state.db_pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Contact request not found"})),
        ));
    }

    Ok(Json(serde_json::json!({
        "id": request_id.to_string(),
        "read": true
    })))
}

pub async fn delete_contact_request(
    Path(request_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let request_id = Uuid::parse_str(&request_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid request id: {}", e)})),
        )
    })?;

    let result = sqlx::query("DELETE FROM contact_requests WHERE id = $1")
        .bind(request_id)
        .execute(&*state.db_pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Contact request not found"})),
        ));
    }

    Ok(Json(serde_json::json!({
        "id": request_id.to_string(),
        "message": "Contact request deleted successfully"
    })))
}
