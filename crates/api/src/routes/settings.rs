//! Tenant settings and behavioral profile endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::{BotProfile, BotProfileResponse};
use persistence::repositories::{BotProfileRepository, BotSettingRepository};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AdminAuth;

/// Request body for setting one key.
#[derive(Debug, Deserialize, Validate)]
pub struct PutSettingRequest {
    #[validate(length(min = 1, max = 4000, message = "Value must be 1-4000 characters"))]
    pub value: String,
}

fn check_scope(auth: &AdminAuth, tenant_id: Uuid) -> Result<(), ApiError> {
    if auth.can_access_tenant(tenant_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Key is not scoped to this tenant".into()))
    }
}

/// GET /api/v1/admin/tenants/:tenant_id/settings
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<HashMap<String, String>>, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = BotSettingRepository::new(state.pool.clone());
    Ok(Json(repo.load_map(tenant_id).await?))
}

/// PUT /api/v1/admin/tenants/:tenant_id/settings/:key
pub async fn put_setting(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, key)): Path<(Uuid, String)>,
    Json(payload): Json<PutSettingRequest>,
) -> Result<StatusCode, ApiError> {
    check_scope(&auth, tenant_id)?;
    payload.validate()?;

    if key.trim().is_empty() || key.len() > 100 {
        return Err(ApiError::Validation(
            "Setting key must be 1-100 characters".into(),
        ));
    }

    let repo = BotSettingRepository::new(state.pool.clone());
    repo.upsert(tenant_id, &key, &payload.value).await?;

    tracing::info!(%tenant_id, setting_key = %key, "Setting saved");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/tenants/:tenant_id/settings/:key
pub async fn delete_setting(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, key)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = BotSettingRepository::new(state.pool.clone());
    if !repo.delete(tenant_id, &key).await? {
        return Err(ApiError::NotFound("Setting not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/tenants/:tenant_id/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<BotProfileResponse>, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = BotProfileRepository::new(state.pool.clone());
    let entity = repo
        .find_by_tenant(tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    Ok(Json(BotProfileResponse {
        tenant_id: entity.tenant_id,
        updated_at: entity.updated_at,
        profile: entity.into(),
    }))
}

/// PUT /api/v1/admin/tenants/:tenant_id/profile
///
/// Whole-document save; the form always submits the complete profile.
pub async fn put_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<BotProfile>,
) -> Result<Json<BotProfileResponse>, ApiError> {
    check_scope(&auth, tenant_id)?;
    payload.validate()?;

    for field in [
        &payload.work_hours_weekday_start,
        &payload.work_hours_weekday_end,
        &payload.work_hours_weekend_start,
        &payload.work_hours_weekend_end,
    ]
    .into_iter()
    .flatten()
    {
        shared::validation::parse_hhmm(field)
            .map_err(|e| ApiError::Validation(format!("Invalid work hour \"{field}\": {e}")))?;
    }

    let repo = BotProfileRepository::new(state.pool.clone());
    let entity = repo.upsert(tenant_id, &payload).await?;

    tracing::info!(%tenant_id, "Profile saved");
    Ok(Json(BotProfileResponse {
        tenant_id: entity.tenant_id,
        updated_at: entity.updated_at,
        profile: entity.into(),
    }))
}
