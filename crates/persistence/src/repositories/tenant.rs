//! Tenant repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::Tenant;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TenantEntity;
use crate::metrics::QueryTimer;

const TENANT_COLUMNS: &str =
    "id, name, phone_number_id, is_active, subscription_expires_at, created_at, updated_at";

/// Repository for tenant database operations.
#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new tenant.
    pub async fn create(
        &self,
        name: &str,
        phone_number_id: &str,
        subscription_expires_at: Option<DateTime<Utc>>,
    ) -> Result<Tenant, sqlx::Error> {
        let timer = QueryTimer::new("create_tenant");
        let entity = sqlx::query_as::<_, TenantEntity>(&format!(
            r#"
            INSERT INTO tenants (name, phone_number_id, subscription_expires_at)
            VALUES ($1, $2, $3)
            RETURNING {TENANT_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(phone_number_id)
        .bind(subscription_expires_at)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(entity.into())
    }

    /// Find tenant by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, sqlx::Error> {
        let timer = QueryTimer::new("find_tenant_by_id");
        let entity = sqlx::query_as::<_, TenantEntity>(&format!(
            r#"
            SELECT {TENANT_COLUMNS}
            FROM tenants
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// Find the tenant bound to a WhatsApp phone-number channel.
    ///
    /// Exactly one tenant matches a channel identifier; the unique index on
    /// phone_number_id enforces it.
    pub async fn find_by_phone_number_id(
        &self,
        phone_number_id: &str,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let timer = QueryTimer::new("find_tenant_by_channel");
        let entity = sqlx::query_as::<_, TenantEntity>(&format!(
            r#"
            SELECT {TENANT_COLUMNS}
            FROM tenants
            WHERE phone_number_id = $1
            "#,
        ))
        .bind(phone_number_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// List tenants ordered by creation time, newest first, with an
    /// optional cursor of (created_at, id) from the previous page.
    pub async fn list_page(
        &self,
        cursor: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<Tenant>, sqlx::Error> {
        let timer = QueryTimer::new("list_tenants");
        let entities = match cursor {
            Some((created_at, id)) => {
                sqlx::query_as::<_, TenantEntity>(&format!(
                    r#"
                    SELECT {TENANT_COLUMNS}
                    FROM tenants
                    WHERE (created_at, id) < ($1, $2)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $3
                    "#,
                ))
                .bind(created_at)
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TenantEntity>(&format!(
                    r#"
                    SELECT {TENANT_COLUMNS}
                    FROM tenants
                    ORDER BY created_at DESC, id DESC
                    LIMIT $1
                    "#,
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        timer.record();

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Update a tenant's name, active flag and/or subscription expiry.
    ///
    /// `None` leaves a field unchanged; `Some(None)` for the expiry clears it.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        is_active: Option<bool>,
        subscription_expires_at: Option<Option<DateTime<Utc>>>,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let timer = QueryTimer::new("update_tenant");
        let entity = sqlx::query_as::<_, TenantEntity>(&format!(
            r#"
            UPDATE tenants
            SET name = COALESCE($2, name),
                is_active = COALESCE($3, is_active),
                subscription_expires_at = CASE WHEN $4 THEN $5 ELSE subscription_expires_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TENANT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .bind(is_active)
        .bind(subscription_expires_at.is_some())
        .bind(subscription_expires_at.flatten())
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// Delete a tenant. Owned intents, examples, flows, settings and
    /// profile rows cascade via foreign keys.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_tenant");
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }
}
