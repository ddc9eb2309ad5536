//! Flow document administration endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use domain::models::FlowGraph;
use persistence::{entities::BotFlowEntity, repositories::BotFlowRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AdminAuth;

/// A stored flow as returned by the admin API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FlowResponse {
    pub id: Uuid,
    pub trigger_intent_name: String,
    pub flow_data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl From<BotFlowEntity> for FlowResponse {
    fn from(e: BotFlowEntity) -> Self {
        Self {
            id: e.id,
            trigger_intent_name: e.trigger_intent_name,
            flow_data: e.flow_data,
            updated_at: e.updated_at,
        }
    }
}

/// Request body for saving a flow document.
#[derive(Debug, Deserialize)]
pub struct SaveFlowRequest {
    pub flow_data: serde_json::Value,
}

fn check_scope(auth: &AdminAuth, tenant_id: Uuid) -> Result<(), ApiError> {
    if auth.can_access_tenant(tenant_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Key is not scoped to this tenant".into()))
    }
}

/// GET /api/v1/admin/tenants/:tenant_id/flows
pub async fn list_flows(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<Vec<FlowResponse>>, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = BotFlowRepository::new(state.pool.clone());
    let flows = repo.list(tenant_id).await?;
    Ok(Json(flows.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/admin/tenants/:tenant_id/flows/:intent_name
pub async fn get_flow(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, intent_name)): Path<(Uuid, String)>,
) -> Result<Json<FlowResponse>, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = BotFlowRepository::new(state.pool.clone());
    let flow = repo
        .find_by_trigger(tenant_id, &intent_name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flow not found".into()))?;

    Ok(Json(flow.into()))
}

/// PUT /api/v1/admin/tenants/:tenant_id/flows/:intent_name
///
/// The document must deserialize into a flow graph before it is stored;
/// structurally broken flows (no start node, dangling edges) are still
/// accepted because the editor saves work in progress, but invalid JSON
/// shapes are not.
pub async fn save_flow(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, intent_name)): Path<(Uuid, String)>,
    Json(payload): Json<SaveFlowRequest>,
) -> Result<Json<FlowResponse>, ApiError> {
    check_scope(&auth, tenant_id)?;

    serde_json::from_value::<FlowGraph>(payload.flow_data.clone())
        .map_err(|e| ApiError::Validation(format!("flow_data is not a valid flow graph: {e}")))?;

    let repo = BotFlowRepository::new(state.pool.clone());
    let flow = repo
        .upsert(tenant_id, &intent_name, &payload.flow_data)
        .await?;

    tracing::info!(%tenant_id, intent = %intent_name, "Flow saved");
    Ok(Json(flow.into()))
}

/// DELETE /api/v1/admin/tenants/:tenant_id/flows/:intent_name
pub async fn delete_flow(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, intent_name)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = BotFlowRepository::new(state.pool.clone());
    if !repo.delete(tenant_id, &intent_name).await? {
        return Err(ApiError::NotFound("Flow not found".into()));
    }

    tracing::info!(%tenant_id, intent = %intent_name, "Flow deleted");
    Ok(StatusCode::NO_CONTENT)
}
