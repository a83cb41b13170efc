use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, DEFAULT_COST};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::database::DatabasePool;
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub language: String,
    pub birth_date: Option<NaiveDate>,
    pub referral_source: Option<String>,
    pub is_colab: bool,
    pub colab_brand_id: Option<String>,
    pub colab_brand_name: Option<String>,
    pub colab_logo_url: Option<String>,
}

#[derive(Serialize)]
pub struct AssociateSummary {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_colab: bool,
}

#[derive(Deserialize)]
pub struct CreateAssociateRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub language: Option<String>,
    pub referral_source: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::date::deserialize_opt")]
    pub birth_date: Option<NaiveDate>,
    pub referral_source: Option<String>,
    pub is_colab: Option<bool>,
    pub colab_brand_id: Option<String>,
    /// When set together with a brand, updates the brand logo for every
    /// associate affiliated with it.
    pub colab_logo_url: Option<String>,
}

#[derive(Serialize)]
pub struct BrandResponse {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBrandLogoRequest {
    pub logo_url: String,
}

fn db_error(e: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Database error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Database error"})),
    )
}

async fn fetch_profile(
    pool: &DatabasePool,
    user_id: Uuid,
) -> Result<Option<ProfileResponse>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT p.id, p.email, p.role, p.full_name, p.phone, p.company_name,
               p.avatar_url, p.bio, p.location, p.country, p.language,
               p.birth_date, p.referral_source, p.is_colab, p.colab_brand_id,
               b.name AS brand_name, b.logo_url AS brand_logo_url
        FROM profiles p
        LEFT JOIN colab_brands b ON b.id = p.colab_brand_id
        WHERE p.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&**pool)
    .await?;

    Ok(row.map(|r| ProfileResponse {
        id: r.get::<Uuid, _>("id").to_string(),
        email: r.get("email"),
        role: r.get("role"),
        full_name: r.get("full_name"),
        phone: r.get("phone"),
        company_name: r.get("company_name"),
        avatar_url: r.get("avatar_url"),
        bio: r.get("bio"),
        location: r.get("location"),
        country: r.get("country"),
        language: r.get("language"),
        birth_date: r.get("birth_date"),
        referral_source: r.get("referral_source"),
        is_colab: r.get("is_colab"),
        colab_brand_id: r.get::<Option<Uuid>, _>("colab_brand_id").map(|id| id.to_string()),
        colab_brand_name: r.get("brand_name"),
        colab_logo_url: r.get("brand_logo_url"),
    }))
}

/// Shared update path for "admin edits an associate" and "associate edits
/// their own profile". The brand reference only survives while is_colab
/// stays true.
async fn apply_profile_update(
    pool: &DatabasePool,
    user_id: Uuid,
    payload: UpdateProfileRequest,
) -> Result<Option<ProfileResponse>, (StatusCode, Json<serde_json::Value>)> {
    let current = fetch_profile(pool, user_id).await.map_err(db_error)?;
    let current = match current {
        Some(c) => c,
        None => return Ok(None),
    };

    let is_colab = payload.is_colab.unwrap_or(current.is_colab);

    let colab_brand_id = if is_colab {
        match payload.colab_brand_id.as_deref() {
            Some("") => None,
            Some(id) => Some(Uuid::parse_str(id).map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": format!("Invalid colab_brand_id: {}", e)})),
                )
            })?),
            None => current
                .colab_brand_id
                .as_deref()
                .and_then(|id| Uuid::parse_str(id).ok()),
        }
    } else {
        None
    };

    sqlx::query(
        r#"
        UPDATE profiles
        SET full_name = $1, phone = $2, company_name = $3, avatar_url = $4,
            bio = $5, location = $6, country = $7, language = $8,
            birth_date = $9, referral_source = $10, is_colab = $11, colab_brand_id = $12
        WHERE id = $13
        "#,
    )
    .bind(payload.full_name.as_ref().or(current.full_name.as_ref()))
    .bind(payload.phone.as_ref().or(current.phone.as_ref()))
    .bind(payload.company_name.as_ref().or(current.company_name.as_ref()))
    .bind(payload.avatar_url.as_ref().or(current.avatar_url.as_ref()))
    .bind(payload.bio.as_ref().or(current.bio.as_ref()))
    .bind(payload.location.as_ref().or(current.location.as_ref()))
    .bind(payload.country.as_ref().or(current.country.as_ref()))
    .bind(payload.language.as_deref().unwrap_or(&current.language))
    .bind(payload.birth_date.or(current.birth_date))
    .bind(payload.referral_source.as_ref().or(current.referral_source.as_ref()))
    .bind(is_colab)
    .bind(colab_brand_id)
    .bind(user_id)
    .execute(&**pool)
    .await
    .map_err(db_error)?;

    // Brand logo update rides along; a failure here only loses the logo,
    // never the profile save.
    if let (true, Some(brand_id), Some(logo_url)) =
        (is_colab, colab_brand_id, payload.colab_logo_url.as_deref())
    {
        if let Err(e) = sqlx::query("UPDATE colab_brands SET logo_url = $1 WHERE id = $2")
            .bind(logo_url)
            .bind(brand_id)
            .execute(&**pool)
            .await
        {
            tracing::error!("Error updating brand logo: {:?}", e);
        }
    }

    fetch_profile(pool, user_id).await.map_err(db_error)
}

pub async fn get_my_profile(
    Extension(auth): Extension<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, (StatusCode, Json<serde_json::Value>)> {
    let profile = fetch_profile(&state.db_pool, auth.user_id)
        .await
        .map_err(db_error)?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Profile not found"})),
        ))?;
    Ok(Json(profile))
}

pub async fn update_my_profile(
    Extension(auth): Extension<AuthUser>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, Json<serde_json::Value>)> {
    let profile = apply_profile_update(&state.db_pool, auth.user_id, payload)
        .await?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Profile not found"})),
        ))?;
    Ok(Json(profile))
}

pub async fn list_associates(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssociateSummary>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query(
        r#"
        SELECT id, email, full_name, company_name, avatar_url, is_colab
        FROM profiles
        WHERE role = 'associate'
        ORDER BY created_at
        "#,
    )
    .fetch_all(&*state.db_pool)
    .await
    .map_err(db_error)?;

    let associates = rows
        .into_iter()
        .map(|r| AssociateSummary {
            id: r.get::<Uuid, _>("id").to_string(),
            email: r.get("email"),
            full_name: r.get("full_name"),
            company_name: r.get("company_name"),
            avatar_url: r.get("avatar_url"),
            is_colab: r.get("is_colab"),
        })
        .collect();

    Ok(Json(associates))
}

pub async fn create_associate(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssociateRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), (StatusCode, Json<serde_json::Value>)> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "A valid email is required"})),
        ));
    }
    if payload.password.len() < 8 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Password must be at least 8 characters"})),
        ));
    }

    let existing = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE email = $1)",
    )
    .bind(&email)
    .fetch_one(&*state.db_pool)
    .await
    .map_err(db_error)?;

    if existing {
        return Err((
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "An account with this email already exists"})),
        ));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Error hashing password: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Failed to create account"})),
        )
    })?;

    let user_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO profiles (id, email, password_hash, role, full_name, language, referral_source, is_colab, created_at)
        VALUES ($1, $2, $3, 'associate', $4, $5, $6, false, NOW())
        "#,
    )
    .bind(user_id)
    .bind(&email)
    .bind(&password_hash)
    .bind(payload.full_name.as_deref())
    .bind(payload.language.as_deref().unwrap_or("pt-BR"))
    .bind(payload.referral_source.as_deref())
    .execute(&*state.db_pool)
    .await
    .map_err(db_error)?;

    let profile = fetch_profile(&state.db_pool, user_id)
        .await
        .map_err(db_error)?
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Failed to create account"})),
        ))?;

    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_associate(
    Path(associate_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, (StatusCode, Json<serde_json::Value>)> {
    let user_id = Uuid::parse_str(&associate_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid associate id: {}", e)})),
        )
    })?;

    let profile = fetch_profile(&state.db_pool, user_id)
        .await
        .map_err(db_error)?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Associate not found"})),
        ))?;

    Ok(Json(profile))
}

pub async fn update_associate(
    Path(associate_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, Json<serde_json::Value>)> {
    let user_id = Uuid::parse_str(&associate_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid associate id: {}", e)})),
        )
    })?;

    let profile = apply_profile_update(&state.db_pool, user_id, payload)
        .await?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Associate not found"})),
        ))?;

    Ok(Json(profile))
}

pub async fn list_brands(
    State(state): State<AppState>,
) -> Result<Json<Vec<BrandResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let rows = sqlx::query("SELECT id, name, logo_url FROM colab_brands ORDER BY name")
        .fetch_all(&*state.db_pool)
        .await
        .map_err(db_error)?;

    let brands = rows
        .into_iter()
        .map(|r| BrandResponse {
            id: r.get::<Uuid, _>("id").to_string(),
            name: r.get("name"),
            logo_url: r.get("logo_url"),
        })
        .collect();

    Ok(Json(brands))
}

pub async fn update_brand_logo(
    Path(brand_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateBrandLogoRequest>,
) -> Result<Json<BrandResponse>, (StatusCode, Json<serde_json::Value>)> {
    let brand_id = Uuid::parse_str(&brand_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("Invalid brand id: {}", e)})),
        )
    })?;

    let row = sqlx::query(
        "UPDATE colab_brands SET logo_url = $1 WHERE id = $2 RETURNING id, name, logo_url",
    )
    .bind(&payload.logo_url)
    .bind(brand_id)
    .fetch_optional(&*state.db_pool)
    .await
    .map_err(db_error)?
    .ok_or((
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Brand not found"})),
    ))?;

    Ok(Json(BrandResponse {
        id: row.get::<Uuid, _>("id").to_string(),
        name: row.get("name"),
        logo_url: row.get("logo_url"),
    }))
}
