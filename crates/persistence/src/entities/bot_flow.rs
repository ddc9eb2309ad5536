//! Bot flow entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the bot_flows table.
///
/// `flow_data` holds the editor's JSON document verbatim; the domain layer
/// deserializes it into a `FlowGraph` when traversal needs it.
#[derive(Debug, Clone, FromRow)]
pub struct BotFlowEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub trigger_intent_name: String,
    pub flow_data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
