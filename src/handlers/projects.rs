use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::models::{Currency, ProjectStatus};
use crate::AppState;

#[derive(Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub user_id: String,
    pub service: String,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub value: f64,
    pub currency: Currency,
    pub hours_balance: f64,
    pub maintenance_end_date: Option<NaiveDate>,
    pub project_url: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub service: String,
    pub value: f64,
    #[serde(default)]
    pub currency: Currency,
    /// Prepaid development hours the contract starts with.
    pub hours_balance: f64,
    #[serde(default, deserialize_with = "crate::utils::date::deserialize_opt")]
    pub maintenance_end_date: Option<NaiveDate>,
    pub project_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProjectStatusRequest {
    pub status: ProjectStatus,
}

#[derive(Deserialize)]
pub struct UpdateProjectHoursRequest {
    pub hours_balance: f64,
}

fn db_error(e: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Database error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Database error"})),
    )
}

fn parse_id(id: &str, name: &str) -> Result<Uuid, (StatusCode, Json<serde_json::Value>)> {
    Uuid::parse_str(id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid {}: {}", name, e)})),
        )
    })
}

fn project_from_row(row: &sqlx::postgres::PgRow) -> ProjectResponse {
    let status: String = row.get("status");
    let currency: String = row.get("currency");
    ProjectResponse {
        id: row.get::<Uuid, _>("id").to_string(),
        user_id: row.get::<Uuid, _>("user_id").to_string(),
        service: row.get("service"),
        status: ProjectStatus::from_str(&status).unwrap_or_default(),
        start_date: row.get("start_date"),
        value: row.get("value"),
        currency: Currency::from_str(&currency).unwrap_or_default(),
        hours_balance: row.get("hours_balance"),
        maintenance_end_date: row.get("maintenance_end_date"),
        project_url: row.get("project_url"),
    }
}

const PROJECT_COLUMNS: &str =
    "id, user_id, service, status, start_date, value, currency, hours_balance, maintenance_end_date, project_url";

async fn fetch_projects_for_user(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<ProjectResponse>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM projects WHERE user_id = $1 ORDER BY start_date, created_at",
        PROJECT_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(&*state.db_pool)
    .await?;

    Ok(rows.iter().map(project_from_row).collect())
}

/// Associate view: only the caller's own projects.
pub async fn my_projects(
    Extension(auth): Extension<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let projects = fetch_projects_for_user(&state, auth.user_id)
        .await
        .map_err(db_error)?;
    Ok(Json(projects))
}

pub async fn list_projects_for_associate(
    Path(associate_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let user_id = parse_id(&associate_id, "associate id")?;
    let projects = fetch_projects_for_user(&state, user_id)
        .await
        .map_err(db_error)?;
    Ok(Json(projects))
}

pub async fn create_project(
    Path(associate_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), (StatusCode, Json<serde_json::Value>)> {
    let user_id = parse_id(&associate_id, "associate id")?;

    if payload.service.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Service name is required"})),
        ));
    }
    if !payload.value.is_finite() || payload.value < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Value must be a non-negative number"})),
        ));
    }
    if !payload.hours_balance.is_finite() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Contracted hours must be a number"})),
        ));
    }

    let owner_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1 AND role = 'associate')",
    )
    .bind(user_id)
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    if !owner_exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Associate not found"})),
        ));
    }

    let project_id = Uuid::new_v4();
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO projects
        (id, user_id, service, status, start_date, value, currency, hours_balance, maintenance_end_date, project_url, created_at)
        VALUES ($1, $2, $3, $4, CURRENT_DATE, $5, $6, $7, $8, $9, NOW())
        RETURNING {}
        "#,
        PROJECT_COLUMNS
    ))
    .bind(project_id)
    .bind(user_id)
    .bind(payload.service.trim())
    .bind(ProjectStatus::Contracted.as_str())
    .bind(payload.value)
    .bind(payload.currency.as_str())
    .bind(payload.hours_balance)
    .bind(payload.maintenance_end_date)
    .bind(payload.project_url.as_deref().filter(|s| !s.is_empty()))
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(project_from_row(&row))))
}

pub async fn delete_project(
    Path(project_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let project_id = parse_id(&project_id, "project id")?;

    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(&*state.db_pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Project not found"})),
        ));
    }

    Ok(Json(serde_json::json!({
        "id": project_id.to_string(),
        "message": "Project deleted successfully"
    })))
}

pub async fn update_project_status(
    Path(project_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProjectStatusRequest>,
) -> Result<Json<ProjectResponse>, (StatusCode, Json<serde_json::Value>)> {
    let project_id = parse_id(&project_id, "project id")?;

    let row = sqlx::query(&format!(
        "UPDATE projects SET status = $1 WHERE id = $2 RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(payload.status.as_str())
    .bind(project_id)
    .fetch_optional(&*state.db_pool)
    .await
    .map_err(db_error)?
    .ok_or((
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Project not found"})),
    ))?;

    Ok(Json(project_from_row(&row)))
}

/// Direct override of the hour balance, used by the inline edit in the
/// project manager. This replaces the balance; logged work goes through
/// the timesheet handlers instead.
pub async fn update_project_hours(
    Path(project_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProjectHoursRequest>,
) -> Result<Json<ProjectResponse>, (StatusCode, Json<serde_json::Value>)> {
    let project_id = parse_id(&project_id, "project id")?;

    if !payload.hours_balance.is_finite() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Hour balance must be a number"})),
        ));
    }

    let row = sqlx::query(&format!(
        "UPDATE projects SET hours_balance = $1 WHERE id = $2 RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(payload.hours_balance)
    .bind(project_id)
    .fetch_optional(&*state.db_pool)
    .await
    .map_err(db_error)?
    .ok_or((
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Project not found"})),
    ))?;

    Ok(Json(project_from_row(&row)))
}
