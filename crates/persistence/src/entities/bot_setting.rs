//! Bot setting entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the bot_settings table.
///
/// Free-form key/value text settings edited on the tenant settings page.
#[derive(Debug, Clone, FromRow)]
pub struct BotSettingEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub setting_key: String,
    pub setting_value: String,
    pub updated_at: DateTime<Utc>,
}
