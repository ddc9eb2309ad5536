//! Admin API key entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the admin_api_keys table.
///
/// Keys authenticate the admin REST API. Only the SHA-256 hash of a key is
/// stored; the plaintext is shown once at creation time.
#[derive(Debug, Clone, FromRow)]
pub struct AdminApiKeyEntity {
    pub id: Uuid,
    pub key_hash: String,
    pub key_prefix: String,
    pub label: String,
    /// Super-admin keys may manage tenants; regular keys manage a tenant's
    /// own intents, flows and settings.
    pub is_super: bool,
    pub tenant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl AdminApiKeyEntity {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}
