//! Time tracking for the project manager: the wall-clock timer, the log
//! recorder and the balance reconciler.
//!
//! Each admin account owns a single timer slot (`active_timers` is keyed by
//! user). Starting while the slot is occupied is a no-op; the client resumes
//! a running timer after a reload by re-reading the stored start time.
//!
//! Committing a log is two sequential statements (insert the log, then debit
//! the balance) with no transaction between them; a failure of the second
//! after the first leaves the ledger and the log history diverged. This
//! mirrors the behavior the back office has always had and is tracked as an
//! open consistency gap rather than silently changed here.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::services::timesheet::{
    debit_hours, duration_minutes, validate_log_description, validate_log_minutes,
    MAX_LOG_MINUTES,
};
use crate::AppState;

#[derive(Deserialize)]
pub struct StartTimerRequest {
    pub project_id: Uuid,
}

#[derive(Deserialize)]
pub struct StopTimerRequest {
    pub description: String,
}

#[derive(Deserialize)]
pub struct ManualLogRequest {
    pub description: String,
    pub duration_minutes: i64,
    #[serde(with = "crate::utils::date")]
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ActiveTimerResponse {
    pub project_id: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_seconds: i64,
}

#[derive(Serialize)]
pub struct TimerStatusResponse {
    pub active: Option<ActiveTimerResponse>,
}

#[derive(Debug, Serialize)]
pub struct CommitLogResponse {
    pub log_id: String,
    pub project_id: String,
    pub duration_minutes: i64,
    pub new_balance: Option<f64>,
}

#[derive(Serialize)]
pub struct ProjectLogResponse {
    pub id: String,
    pub project_id: String,
    pub description: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

fn db_error(e: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Database error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Database error"})),
    )
}

pub async fn start_timer(
    Extension(auth): Extension<AuthUser>,
    State(state): State<AppState>,
    Json(payload): Json<StartTimerRequest>,
) -> Result<(StatusCode, Json<ActiveTimerResponse>), (StatusCode, Json<serde_json::Value>)> {
    let project_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)",
    )
    .bind(payload.project_id)
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    if !project_exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Project not found"})),
        ));
    }

    // The primary key on user_id is the single slot: a second start while a
    // timer runs inserts nothing and must not disturb the running timer.
    let started_at = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO active_timers (user_id, project_id, started_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.project_id)
    .bind(started_at)
    .execute(&*state.db_pool)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "A timer is already running"})),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(ActiveTimerResponse {
            project_id: payload.project_id.to_string(),
            started_at,
            elapsed_seconds: 0,
        }),
    ))
}

/// Current slot for the caller. A client that reloads re-reads the stored
/// start time from here, so elapsed time continues instead of resetting.
pub async fn timer_status(
    Extension(auth): Extension<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<TimerStatusResponse>, (StatusCode, Json<serde_json::Value>)> {
    let row = sqlx::query("SELECT project_id, started_at FROM active_timers WHERE user_id = $1")
        .bind(auth.user_id)
        .fetch_optional(&*state.db_pool)
        .await
        .map_err(db_error)?;

    let active = row.map(|r| {
        let started_at: DateTime<Utc> = r.get("started_at");
        ActiveTimerResponse {
            project_id: r.get::<Uuid, _>("project_id").to_string(),
            started_at,
            elapsed_seconds: (Utc::now() - started_at).num_seconds().max(0),
        }
    });

    Ok(Json(TimerStatusResponse { active }))
}

pub async fn stop_timer(
    Extension(auth): Extension<AuthUser>,
    State(state): State<AppState>,
    Json(payload): Json<StopTimerRequest>,
) -> Result<Json<CommitLogResponse>, (StatusCode, Json<serde_json::Value>)> {
    // The timer keeps running on a rejected description; the confirmation
    // dialog stays open until the admin describes the work or cancels.
    let description = validate_log_description(&payload.description).map_err(|reason| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": reason})),
        )
    })?;

    let slot = sqlx::query("SELECT project_id, started_at FROM active_timers WHERE user_id = $1")
        .bind(auth.user_id)
        .fetch_optional(&*state.db_pool)
        .await
        .map_err(db_error)?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No timer is running"})),
        ))?;

    let project_id: Uuid = slot.get("project_id");
    let started_at: DateTime<Utc> = slot.get("started_at");
    let ended_at = Utc::now();
    // A slot that somehow sat running past the cap still stops cleanly.
    let minutes = duration_minutes(started_at, ended_at).min(MAX_LOG_MINUTES) as i32;

    let (log_id, new_balance) =
        commit_log(&state, project_id, description, Some((started_at, ended_at)), minutes, ended_at)
            .await?;

    sqlx::query("DELETE FROM active_timers WHERE user_id = $1")
        .bind(auth.user_id)
        .execute(&*state.db_pool)
        .await
        .map_err(db_error)?;

    Ok(Json(CommitLogResponse {
        log_id: log_id.to_string(),
        project_id: project_id.to_string(),
        duration_minutes: i64::from(minutes),
        new_balance,
    }))
}

/// Manual entry path: same reconciliation arithmetic as the timer, driven by
/// a user-supplied minute count and date instead of a running clock.
pub async fn manual_log(
    Path(project_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ManualLogRequest>,
) -> Result<(StatusCode, Json<CommitLogResponse>), (StatusCode, Json<serde_json::Value>)> {
    let project_id = Uuid::parse_str(&project_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid project id: {}", e)})),
        )
    })?;

    let description = validate_log_description(&payload.description).map_err(|reason| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": reason})),
        )
    })?;
    let minutes = validate_log_minutes(payload.duration_minutes).map_err(|reason| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": reason})),
        )
    })?;

    let project_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)",
    )
    .bind(project_id)
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    if !project_exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Project not found"})),
        ));
    }

    let logged_at = payload
        .date
        .and_hms_opt(0, 0, 0)
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
        .unwrap_or_else(Utc::now);

    let (log_id, new_balance) =
        commit_log(&state, project_id, description, None, minutes, logged_at).await?;

    Ok((
        StatusCode::CREATED,
        Json(CommitLogResponse {
            log_id: log_id.to_string(),
            project_id: project_id.to_string(),
            duration_minutes: i64::from(minutes),
            new_balance,
        }),
    ))
}

/// Insert the log entry, then debit the project's hour balance.
/// Deliberately two statements, no transaction (see module docs).
async fn commit_log(
    state: &AppState,
    project_id: Uuid,
    description: &str,
    span: Option<(DateTime<Utc>, DateTime<Utc>)>,
    minutes: i32,
    created_at: DateTime<Utc>,
) -> Result<(Uuid, Option<f64>), (StatusCode, Json<serde_json::Value>)> {
    let log_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO project_logs (id, project_id, description, start_time, end_time, duration_minutes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(log_id)
    .bind(project_id)
    .bind(description)
    .bind(span.map(|(start, _)| start))
    .bind(span.map(|(_, end)| end))
    .bind(minutes)
    .bind(created_at)
    .execute(&*state.db_pool)
    .await
    .map_err(|e| {
        tracing::error!("Error inserting project log: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Failed to record work log"})),
        )
    })?;

    let balance = sqlx::query_scalar::<_, f64>("SELECT hours_balance FROM projects WHERE id = $1")
        .bind(project_id)
        .fetch_optional(&*state.db_pool)
        .await
        .map_err(db_error)?;

    let new_balance = match balance {
        Some(balance) => {
            let new_balance = debit_hours(balance, i64::from(minutes));
            sqlx::query("UPDATE projects SET hours_balance = $1 WHERE id = $2")
                .bind(new_balance)
                .bind(project_id)
                .execute(&*state.db_pool)
                .await
                .map_err(|e| {
                    // The log row is already in; the ledger now lags it.
                    tracing::error!("Error debiting hour balance after log insert: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({"error": "Failed to update hour balance"})),
                    )
                })?;
            Some(new_balance)
        }
        None => {
            tracing::warn!("Project {} vanished before balance update", project_id);
            None
        }
    };

    Ok((log_id, new_balance))
}

/// Work history for a project, newest first. Associates only see their own
/// projects; admins see everything.
pub async fn list_logs(
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectLogResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let project_id = Uuid::parse_str(&project_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid project id: {}", e)})),
        )
    })?;

    let owner: Option<Uuid> =
        sqlx::query_scalar("SELECT user_id FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&*state.db_pool)
            .await
            .map_err(db_error)?;

    let owner = owner.ok_or((
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Project not found"})),
    ))?;

    if !auth.is_admin() && owner != auth.user_id {
        return Err((
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "code": "VERTEX_FORBIDDEN",
                "message": "Insufficient permissions"
            })),
        ));
    }

    let rows = sqlx::query(
        r#"
        SELECT id, project_id, description, start_time, end_time, duration_minutes, created_at
        FROM project_logs
        WHERE project_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(project_id)
    .fetch_all(&*state.db_pool)
    .await
    .map_err(db_error)?;

    let logs = rows
        .into_iter()
        .map(|r| ProjectLogResponse {
            id: r.get::<Uuid, _>("id").to_string(),
            project_id: r.get::<Uuid, _>("project_id").to_string(),
            description: r.get("description"),
            start_time: r.get("start_time"),
            end_time: r.get("end_time"),
            duration_minutes: r.get("duration_minutes"),
            created_at: r.get("created_at"),
        })
        .collect();

    Ok(Json(logs))
}
