//! Intent and training example administration endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::{AddExampleRequest, CreateIntentRequest, Intent, IntentExample};
use persistence::repositories::IntentRepository;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AdminAuth;

/// An intent together with its stored examples, as returned on creation.
#[derive(Debug, Serialize)]
pub struct IntentWithExamplesResponse {
    #[serde(flatten)]
    pub intent: Intent,
    pub examples: Vec<IntentExample>,
}

fn check_scope(auth: &AdminAuth, tenant_id: Uuid) -> Result<(), ApiError> {
    if auth.can_access_tenant(tenant_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Key is not scoped to this tenant".into()))
    }
}

/// GET /api/v1/admin/tenants/:tenant_id/intents
pub async fn list_intents(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<Vec<Intent>>, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = IntentRepository::new(state.pool.clone());
    Ok(Json(repo.list(tenant_id).await?))
}

/// POST /api/v1/admin/tenants/:tenant_id/intents
///
/// Creates the intent and any initial examples in one call, matching how
/// the admin form saves.
pub async fn create_intent(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CreateIntentRequest>,
) -> Result<(StatusCode, Json<IntentWithExamplesResponse>), ApiError> {
    check_scope(&auth, tenant_id)?;
    payload.validate()?;

    if !shared::validation::is_valid_intent_name(&payload.name) {
        return Err(ApiError::Validation(
            "Intent name must be non-empty without surrounding whitespace".into(),
        ));
    }

    let repo = IntentRepository::new(state.pool.clone());
    let intent = repo.create(tenant_id, &payload.name).await?;

    let mut examples = Vec::with_capacity(payload.examples.len());
    for text in &payload.examples {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        examples.push(repo.add_example(intent.id, trimmed).await?);
    }

    tracing::info!(%tenant_id, intent_id = %intent.id, "Intent created");
    Ok((
        StatusCode::CREATED,
        Json(IntentWithExamplesResponse { intent, examples }),
    ))
}

/// DELETE /api/v1/admin/tenants/:tenant_id/intents/:intent_id
pub async fn delete_intent(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, intent_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = IntentRepository::new(state.pool.clone());
    if !repo.delete(tenant_id, intent_id).await? {
        return Err(ApiError::NotFound("Intent not found".into()));
    }

    tracing::info!(%tenant_id, %intent_id, "Intent deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/tenants/:tenant_id/intents/:intent_id/examples
pub async fn list_examples(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, intent_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<IntentExample>>, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = IntentRepository::new(state.pool.clone());
    repo.find_by_id(tenant_id, intent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Intent not found".into()))?;

    Ok(Json(repo.list_examples(intent_id).await?))
}

/// POST /api/v1/admin/tenants/:tenant_id/intents/:intent_id/examples
pub async fn add_example(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, intent_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AddExampleRequest>,
) -> Result<(StatusCode, Json<IntentExample>), ApiError> {
    check_scope(&auth, tenant_id)?;
    payload.validate()?;

    let repo = IntentRepository::new(state.pool.clone());
    repo.find_by_id(tenant_id, intent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Intent not found".into()))?;

    let example = repo.add_example(intent_id, payload.text.trim()).await?;
    Ok((StatusCode::CREATED, Json(example)))
}

/// DELETE /api/v1/admin/tenants/:tenant_id/intents/:intent_id/examples/:example_id
pub async fn delete_example(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path((tenant_id, intent_id, example_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    check_scope(&auth, tenant_id)?;

    let repo = IntentRepository::new(state.pool.clone());

    // Ownership check before the unscoped example delete.
    repo.find_by_id(tenant_id, intent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Intent not found".into()))?;

    if !repo.delete_example(example_id).await? {
        return Err(ApiError::NotFound("Example not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}
