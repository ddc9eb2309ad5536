//! Admin API key repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AdminApiKeyEntity;
use crate::metrics::QueryTimer;

const KEY_COLUMNS: &str =
    "id, key_hash, key_prefix, label, is_super, tenant_id, created_at, revoked_at";

/// Repository for admin API key database operations.
#[derive(Clone)]
pub struct AdminApiKeyRepository {
    pool: PgPool,
}

impl AdminApiKeyRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a key by its SHA-256 hash.
    pub async fn find_by_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<AdminApiKeyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_key_by_hash");
        let entity = sqlx::query_as::<_, AdminApiKeyEntity>(&format!(
            r#"
            SELECT {KEY_COLUMNS}
            FROM admin_api_keys
            WHERE key_hash = $1
            "#,
        ))
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity)
    }

    /// Insert a new key record.
    pub async fn create(
        &self,
        key_hash: &str,
        key_prefix: &str,
        label: &str,
        is_super: bool,
        tenant_id: Option<Uuid>,
    ) -> Result<AdminApiKeyEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_admin_key");
        let entity = sqlx::query_as::<_, AdminApiKeyEntity>(&format!(
            r#"
            INSERT INTO admin_api_keys (key_hash, key_prefix, label, is_super, tenant_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {KEY_COLUMNS}
            "#,
        ))
        .bind(key_hash)
        .bind(key_prefix)
        .bind(label)
        .bind(is_super)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(entity)
    }

    /// Count keys that are not revoked. Used by the bootstrap check.
    pub async fn count_active(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_admin_keys");
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admin_api_keys WHERE revoked_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(count)
    }
}
