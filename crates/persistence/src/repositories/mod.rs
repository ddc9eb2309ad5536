//! Repository implementations.

mod admin_api_key;
mod bot_flow;
mod bot_profile;
mod bot_setting;
mod intent;
mod tenant;

pub use admin_api_key::AdminApiKeyRepository;
pub use bot_flow::BotFlowRepository;
pub use bot_profile::BotProfileRepository;
pub use bot_setting::BotSettingRepository;
pub use intent::IntentRepository;
pub use tenant::TenantRepository;
