//! Tenant entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Tenant;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the tenants table.
#[derive(Debug, Clone, FromRow)]
pub struct TenantEntity {
    pub id: Uuid,
    pub name: String,
    pub phone_number_id: String,
    pub is_active: bool,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TenantEntity> for Tenant {
    fn from(e: TenantEntity) -> Self {
        Tenant {
            id: e.id,
            name: e.name,
            phone_number_id: e.phone_number_id,
            is_active: e.is_active,
            subscription_expires_at: e.subscription_expires_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
