//! Bot flow repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BotFlowEntity;
use crate::metrics::QueryTimer;

/// Repository for flow-document database operations.
#[derive(Clone)]
pub struct BotFlowRepository {
    pool: PgPool,
}

impl BotFlowRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the flow triggered by an intent, matched case-insensitively.
    pub async fn find_by_trigger(
        &self,
        tenant_id: Uuid,
        intent_name: &str,
    ) -> Result<Option<BotFlowEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_flow_by_trigger");
        let entity = sqlx::query_as::<_, BotFlowEntity>(
            r#"
            SELECT id, tenant_id, trigger_intent_name, flow_data, updated_at
            FROM bot_flows
            WHERE tenant_id = $1 AND LOWER(trigger_intent_name) = LOWER($2)
            "#,
        )
        .bind(tenant_id)
        .bind(intent_name)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity)
    }

    /// List a tenant's flows.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<BotFlowEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_flows");
        let entities = sqlx::query_as::<_, BotFlowEntity>(
            r#"
            SELECT id, tenant_id, trigger_intent_name, flow_data, updated_at
            FROM bot_flows
            WHERE tenant_id = $1
            ORDER BY trigger_intent_name
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities)
    }

    /// Save a flow document, fully overwriting any previous version for the
    /// same (tenant, intent) pair. The editor always saves whole documents;
    /// there is no versioning.
    pub async fn upsert(
        &self,
        tenant_id: Uuid,
        intent_name: &str,
        flow_data: &serde_json::Value,
    ) -> Result<BotFlowEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_flow");
        let entity = sqlx::query_as::<_, BotFlowEntity>(
            r#"
            INSERT INTO bot_flows (tenant_id, trigger_intent_name, flow_data)
            VALUES ($1, $2, $3)
            ON CONFLICT (tenant_id, trigger_intent_name)
            DO UPDATE SET flow_data = EXCLUDED.flow_data, updated_at = NOW()
            RETURNING id, tenant_id, trigger_intent_name, flow_data, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(intent_name)
        .bind(flow_data)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(entity)
    }

    /// Delete the flow for a (tenant, intent) pair.
    pub async fn delete(&self, tenant_id: Uuid, intent_name: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_flow");
        let result = sqlx::query(
            "DELETE FROM bot_flows WHERE tenant_id = $1 AND LOWER(trigger_intent_name) = LOWER($2)",
        )
        .bind(tenant_id)
        .bind(intent_name)
        .execute(&self.pool)
        .await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }
}
