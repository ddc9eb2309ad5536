//! Tenant administration endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::{CreateTenantRequest, TenantResponse, UpdateTenantRequest};
use persistence::repositories::TenantRepository;
use serde::{Deserialize, Serialize};
use shared::pagination::{decode_cursor, encode_cursor};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AdminAuth;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Query parameters for tenant listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// One page of tenants.
#[derive(Debug, Serialize)]
pub struct TenantPage {
    pub tenants: Vec<TenantResponse>,
    pub next_cursor: Option<String>,
}

/// POST /api/v1/admin/tenants (super admin)
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(payload): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantResponse>), ApiError> {
    payload.validate()?;

    let repo = TenantRepository::new(state.pool.clone());
    let tenant = repo
        .create(
            &payload.name,
            &payload.phone_number_id,
            payload.subscription_expires_at,
        )
        .await?;

    tracing::info!(tenant_id = %tenant.id, "Tenant created");
    Ok((StatusCode::CREATED, Json(tenant.into())))
}

/// GET /api/v1/admin/tenants (super admin)
pub async fn list_tenants(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TenantPage>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let cursor = match params.cursor.as_deref() {
        Some(raw) => {
            Some(decode_cursor(raw).map_err(|e| ApiError::Validation(e.to_string()))?)
        }
        None => None,
    };

    let repo = TenantRepository::new(state.pool.clone());
    let tenants = repo.list_page(cursor, limit).await?;

    let next_cursor = if tenants.len() as i64 == limit {
        tenants.last().map(|t| encode_cursor(t.created_at, t.id))
    } else {
        None
    };

    Ok(Json(TenantPage {
        tenants: tenants.into_iter().map(Into::into).collect(),
        next_cursor,
    }))
}

/// GET /api/v1/admin/tenants/:tenant_id
pub async fn get_tenant(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<TenantResponse>, ApiError> {
    if !auth.can_access_tenant(tenant_id) {
        return Err(ApiError::Forbidden("Key is not scoped to this tenant".into()));
    }

    let repo = TenantRepository::new(state.pool.clone());
    let tenant = repo
        .find_by_id(tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".into()))?;

    Ok(Json(tenant.into()))
}

/// PUT /api/v1/admin/tenants/:tenant_id
pub async fn update_tenant(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<UpdateTenantRequest>,
) -> Result<Json<TenantResponse>, ApiError> {
    if !auth.can_access_tenant(tenant_id) {
        return Err(ApiError::Forbidden("Key is not scoped to this tenant".into()));
    }
    payload.validate()?;

    // Only a super admin may flip activation or move the expiry date.
    if !auth.is_super
        && (payload.is_active.is_some() || payload.subscription_expires_at.is_some())
    {
        return Err(ApiError::Forbidden(
            "Only a super admin may change activation or subscription".into(),
        ));
    }

    let repo = TenantRepository::new(state.pool.clone());
    let tenant = repo
        .update(
            tenant_id,
            payload.name.as_deref(),
            payload.is_active,
            payload.subscription_expires_at,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".into()))?;

    tracing::info!(tenant_id = %tenant.id, "Tenant updated");
    Ok(Json(tenant.into()))
}

/// DELETE /api/v1/admin/tenants/:tenant_id (super admin)
pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = TenantRepository::new(state.pool.clone());
    let deleted = repo.delete(tenant_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Tenant not found".into()));
    }

    tracing::info!(%tenant_id, "Tenant deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let params: ListParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(params.cursor.is_none());
        assert!(params.limit.is_none());
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(5000i64.clamp(1, MAX_PAGE_SIZE), MAX_PAGE_SIZE);
        assert_eq!(0i64.clamp(1, MAX_PAGE_SIZE), 1);
        assert_eq!(25i64.clamp(1, MAX_PAGE_SIZE), 25);
    }
}
