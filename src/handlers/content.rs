//! Marketing site content: the static landing page plus the service and
//! product catalogs. Public routes only return active entries; the admin
//! routes manage the full set.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Json},
};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::AppState;

pub async fn landing_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

#[derive(Serialize)]
pub struct ServiceResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub active: bool,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub active: bool,
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

fn db_error(e: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Database error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Database error"})),
    )
}

fn parse_id(id: &str) -> Result<Uuid, (StatusCode, Json<serde_json::Value>)> {
    Uuid::parse_str(id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid id: {}", e)})),
        )
    })
}

fn service_from_row(row: &sqlx::postgres::PgRow) -> ServiceResponse {
    ServiceResponse {
        id: row.get::<Uuid, _>("id").to_string(),
        slug: row.get("slug"),
        title: row.get("title"),
        description: row.get("description"),
        active: row.get("active"),
    }
}

fn product_from_row(row: &sqlx::postgres::PgRow) -> ProductResponse {
    ProductResponse {
        id: row.get::<Uuid, _>("id").to_string(),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        active: row.get("active"),
    }
}

/// Public catalog, active services only.
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query(
        "SELECT id, slug, title, description, active FROM services WHERE active = TRUE ORDER BY title",
    )
    .fetch_all(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok(Json(rows.iter().map(service_from_row).collect()))
}

/// Public catalog, active products only.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query(
        "SELECT id, name, description, price, active FROM products WHERE active = TRUE ORDER BY name",
    )
    .fetch_all(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok(Json(rows.iter().map(product_from_row).collect()))
}

pub async fn admin_list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query("SELECT id, slug, title, description, active FROM services ORDER BY title")
        .fetch_all(&*state.db_pool)
        .await
        .map_err(db_error)?;

    Ok(Json(rows.iter().map(service_from_row).collect()))
}

pub async fn set_service_active(
    Path(service_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<Json<ServiceResponse>, (StatusCode, Json<serde_json::Value>)> {
    let service_id = parse_id(&service_id)?;

    let row = sqlx::query(
        "UPDATE services SET active = $1 WHERE id = $2
         RETURNING id, slug, title, description, active",
    )
    .bind(payload.active)
    .bind(service_id)
    .fetch_optional(&*state.db_pool)
    .await
    .map_err(db_error)?
    .ok_or((
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Service not found"})),
    ))?;

    Ok(Json(service_from_row(&row)))
}

pub async fn admin_list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query("SELECT id, name, description, price, active FROM products ORDER BY name")
        .fetch_all(&*state.db_pool)
        .await
        .map_err(db_error)?;

    Ok(Json(rows.iter().map(product_from_row).collect()))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), (StatusCode, Json<serde_json::Value>)> {
    if payload.name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Product name is required"})),
        ));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Price must be a non-negative number"})),
        ));
    }

    let product_id = Uuid::new_v4();
    let row = sqlx::query(
        r#"
        INSERT INTO products (id, name, description, price, active, created_at)
        VALUES ($1, $2, $3, $4, TRUE, NOW())
        RETURNING id, name, description, price, active
        "#,
    )
    .bind(product_id)
    .bind(payload.name.trim())
    .bind(payload.description.trim())
    .bind(payload.price)
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(product_from_row(&row))))
}

pub async fn set_product_active(
    Path(product_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<serde_json::Value>)> {
    let product_id = parse_id(&product_id)?;

    let row = sqlx::query(
        "UPDATE products SET active = $1 WHERE id = $2
         RETURNING id, name, description, price, active",
    )
    .bind(payload.active)
    .bind(product_id)
    .fetch_optional(&*state.db_pool)
    .await
    .map_err(db_error)?
    .ok_or((
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Product not found"})),
    ))?;

    Ok(Json(product_from_row(&row)))
}

pub async fn delete_product(
    Path(product_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let product_id = parse_id(&product_id)?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(&*state.db_pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Product not found"})),
        ));
    }

    Ok(Json(serde_json::json!({
        "id": product_id.to_string(),
        "message": "Product deleted successfully"
    })))
}
