//! Income/expense ledger. Amounts are stored converted to BRL; the original
//! amount, currency and the rate used are kept alongside for the audit trail.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::models::Currency;
use crate::AppState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "income" => Some(RecordKind::Income),
            "expense" => Some(RecordKind::Expense),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateRecordRequest {
    pub record_type: RecordKind,
    pub description: String,
    /// Amount in `currency`; converted to BRL at insert time.
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    pub payer: Option<String>,
    pub payment_method: Option<String>,
    /// Percentage applied to the converted amount, e.g. 15.5.
    pub tax_rate: Option<f64>,
    #[serde(with = "crate::utils::date")]
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct FinancialRecordResponse {
    pub id: String,
    pub record_type: RecordKind,
    pub description: String,
    pub amount: f64,
    pub original_amount: f64,
    pub currency: Currency,
    pub exchange_rate: f64,
    pub payer: Option<String>,
    pub payment_method: Option<String>,
    pub tax_amount: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

fn db_error(e: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Database error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Database error"})),
    )
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> FinancialRecordResponse {
    let record_type: String = row.get("record_type");
    let currency: String = row.get("currency");
    FinancialRecordResponse {
        id: row.get::<Uuid, _>("id").to_string(),
        record_type: RecordKind::from_str(&record_type).unwrap_or(RecordKind::Expense),
        description: row.get("description"),
        amount: row.get("amount"),
        original_amount: row.get("original_amount"),
        currency: Currency::from_str(&currency).unwrap_or_default(),
        exchange_rate: row.get("exchange_rate"),
        payer: row.get("payer"),
        payment_method: row.get("payment_method"),
        tax_amount: row.get("tax_amount"),
        date: row.get("date"),
        created_at: row.get("created_at"),
    }
}

const RECORD_COLUMNS: &str = "id, record_type, description, amount, original_amount, currency, exchange_rate, payer, payment_method, tax_amount, date, created_at";

pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<FinancialRecordResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM financial_records ORDER BY date DESC, created_at DESC",
        RECORD_COLUMNS
    ))
    .fetch_all(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok(Json(rows.iter().map(record_from_row).collect()))
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(payload): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<FinancialRecordResponse>), (StatusCode, Json<serde_json::Value>)> {
    if payload.description.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Description is required"})),
        ));
    }
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Amount must be a positive number"})),
        ));
    }

    // Rate fetch never blocks record creation: on failure the table is empty
    // and conversion passes through at 1.0.
    let rates = state.rates.fetch_or_default().await;
    let exchange_rate = rates.to_brl(payload.currency);
    let amount_in_brl = payload.amount * exchange_rate;
    let tax_amount = payload
        .tax_rate
        .filter(|r| r.is_finite() && *r > 0.0)
        .map(|r| amount_in_brl * r / 100.0)
        .unwrap_or(0.0);

    let record_id = Uuid::new_v4();
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO financial_records
        (id, record_type, description, amount, original_amount, currency, exchange_rate, payer, payment_method, tax_amount, date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
        RETURNING {}
        "#,
        RECORD_COLUMNS
    ))
    .bind(record_id)
    .bind(payload.record_type.as_str())
    .bind(payload.description.trim())
    .bind(amount_in_brl)
    .bind(payload.amount)
    .bind(payload.currency.as_str())
    .bind(exchange_rate)
    .bind(payload.payer.as_deref().filter(|s| !s.is_empty()))
    .bind(payload.payment_method.as_deref().filter(|s| !s.is_empty()))
    .bind(tax_amount)
    .bind(payload.date)
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(record_from_row(&row))))
}

pub async fn delete_record(
    Path(record_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let record_id = Uuid::parse_str(&record_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid record id: {}", e)})),
        )
    })?;

    let result = sqlx::query("DELETE FROM financial_records WHERE id = $1")
        .bind(record_id)
        .execute(&*state.db_pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Record not found"})),
        ));
    }

    Ok(Json(serde_json::json!({
        "id": record_id.to_string(),
        "message": "Record deleted successfully"
    })))
}

/// Current conversion rates to BRL for the currencies the form offers.
pub async fn get_rates(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let rates = state.rates.fetch_or_default().await;

    Ok(Json(serde_json::json!({
        "USD": rates.to_brl(Currency::USD),
        "EUR": rates.to_brl(Currency::EUR),
        "CHF": rates.to_brl(Currency::CHF),
        "degraded": rates.is_empty(),
    })))
}
