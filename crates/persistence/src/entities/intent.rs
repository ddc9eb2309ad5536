//! Intent entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{Intent, IntentExample};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the intents table.
#[derive(Debug, Clone, FromRow)]
pub struct IntentEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub intent_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<IntentEntity> for Intent {
    fn from(e: IntentEntity) -> Self {
        Intent {
            id: e.id,
            tenant_id: e.tenant_id,
            name: e.intent_name,
            created_at: e.created_at,
        }
    }
}

/// Database row mapping for the intent_examples table.
#[derive(Debug, Clone, FromRow)]
pub struct IntentExampleEntity {
    pub id: Uuid,
    pub intent_id: Uuid,
    pub example_text: String,
}

impl From<IntentExampleEntity> for IntentExample {
    fn from(e: IntentExampleEntity) -> Self {
        IntentExample {
            id: e.id,
            intent_id: e.intent_id,
            example_text: e.example_text,
        }
    }
}
