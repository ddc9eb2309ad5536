//! Bot setting repository for database operations.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BotSettingEntity;
use crate::metrics::QueryTimer;

/// Repository for the key/value text settings table.
#[derive(Clone)]
pub struct BotSettingRepository {
    pool: PgPool,
}

impl BotSettingRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load all of a tenant's settings as a key→value map.
    pub async fn load_map(&self, tenant_id: Uuid) -> Result<HashMap<String, String>, sqlx::Error> {
        let timer = QueryTimer::new("load_settings_map");
        let entities = sqlx::query_as::<_, BotSettingEntity>(
            r#"
            SELECT id, tenant_id, setting_key, setting_value, updated_at
            FROM bot_settings
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities
            .into_iter()
            .map(|e| (e.setting_key, e.setting_value))
            .collect())
    }

    /// Upsert one setting key.
    pub async fn upsert(
        &self,
        tenant_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<BotSettingEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_setting");
        let entity = sqlx::query_as::<_, BotSettingEntity>(
            r#"
            INSERT INTO bot_settings (tenant_id, setting_key, setting_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (tenant_id, setting_key)
            DO UPDATE SET setting_value = EXCLUDED.setting_value, updated_at = NOW()
            RETURNING id, tenant_id, setting_key, setting_value, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(entity)
    }

    /// Delete one setting key.
    pub async fn delete(&self, tenant_id: Uuid, key: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_setting");
        let result =
            sqlx::query("DELETE FROM bot_settings WHERE tenant_id = $1 AND setting_key = $2")
                .bind(tenant_id)
                .bind(key)
                .execute(&self.pool)
                .await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }
}
