//! Authentication middleware.
//!
//! Validates the `X-API-Key` header against the stored admin key hashes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use persistence::repositories::AdminApiKeyRepository;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;

/// Authenticated admin key stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub key_id: Uuid,
    pub label: String,
    pub is_super: bool,
    /// Non-super keys are scoped to a single tenant.
    pub tenant_id: Option<Uuid>,
}

impl AdminAuth {
    /// Whether this key may operate on the given tenant.
    pub fn can_access_tenant(&self, tenant_id: Uuid) -> bool {
        self.is_super || self.tenant_id == Some(tenant_id)
    }
}

/// Looks up the presented key by hash and returns the auth context.
async fn validate_key(state: &AppState, presented: &str) -> Result<AdminAuth, Response> {
    let repo = AdminApiKeyRepository::new(state.pool.clone());
    let hash = shared::crypto::sha256_hex(presented);

    let entity = repo
        .find_by_hash(&hash)
        .await
        .map_err(|e| {
            tracing::error!("API key lookup failed: {}", e);
            internal_response()
        })?
        .ok_or_else(|| unauthorized_response("Invalid or missing API key"))?;

    if entity.is_revoked() {
        return Err(unauthorized_response("API key has been revoked"));
    }

    Ok(AdminAuth {
        key_id: entity.id,
        label: entity.label,
        is_super: entity.is_super,
        tenant_id: entity.tenant_id,
    })
}

/// Middleware that requires a valid admin API key.
///
/// Validates the `X-API-Key` header and rejects requests without a valid
/// key. The authenticated key is stored in request extensions for use by
/// downstream handlers.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let api_key = req.headers().get("X-API-Key").and_then(|v| v.to_str().ok());

    let api_key = match api_key {
        Some(key) => key.to_string(),
        None => {
            return unauthorized_response("Invalid or missing API key");
        }
    };

    match validate_key(&state, &api_key).await {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(response) => response,
    }
}

/// Middleware for routes only a super admin key may reach, such as
/// tenant creation and deletion.
pub async fn require_super_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let api_key = req.headers().get("X-API-Key").and_then(|v| v.to_str().ok());

    let api_key = match api_key {
        Some(key) => key.to_string(),
        None => {
            return unauthorized_response("Invalid or missing API key");
        }
    };

    match validate_key(&state, &api_key).await {
        Ok(auth) => {
            if !auth.is_super {
                return forbidden_response("Super admin access required");
            }
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(response) => response,
    }
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

fn internal_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An internal error occurred"
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Invalid or missing API key");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_response() {
        let response = forbidden_response("Super admin access required");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_super_key_accesses_any_tenant() {
        let auth = AdminAuth {
            key_id: Uuid::new_v4(),
            label: "root".into(),
            is_super: true,
            tenant_id: None,
        };
        assert!(auth.can_access_tenant(Uuid::new_v4()));
    }

    #[test]
    fn test_scoped_key_limited_to_own_tenant() {
        let tenant_id = Uuid::new_v4();
        let auth = AdminAuth {
            key_id: Uuid::new_v4(),
            label: "tenant-ops".into(),
            is_super: false,
            tenant_id: Some(tenant_id),
        };
        assert!(auth.can_access_tenant(tenant_id));
        assert!(!auth.can_access_tenant(Uuid::new_v4()));
    }

    #[test]
    fn test_unscoped_non_super_key_denied() {
        let auth = AdminAuth {
            key_id: Uuid::new_v4(),
            label: "orphan".into(),
            is_super: false,
            tenant_id: None,
        };
        assert!(!auth.can_access_tenant(Uuid::new_v4()));
    }
}
