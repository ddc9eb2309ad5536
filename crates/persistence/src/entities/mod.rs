//! Entity definitions (database row mappings).

mod admin_api_key;
mod bot_flow;
mod bot_profile;
mod bot_setting;
mod intent;
mod tenant;

pub use admin_api_key::AdminApiKeyEntity;
pub use bot_flow::BotFlowEntity;
pub use bot_profile::BotProfileEntity;
pub use bot_setting::BotSettingEntity;
pub use intent::{IntentEntity, IntentExampleEntity};
pub use tenant::TenantEntity;
