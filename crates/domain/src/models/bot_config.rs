//! Bot configuration models.
//!
//! A tenant's behavior is configured in two places: a free-form key/value
//! "text settings" table edited on the settings page, and a typed behavioral
//! profile row. [`BotConfig`] is the flattened view the routing engine
//! consumes; it is recomputed per inbound message and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Typed behavioral profile for one tenant.
///
/// All fields are optional; a tenant without a profile row behaves as if
/// every field were unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct BotProfile {
    pub ai_enabled: Option<bool>,
    pub ai_prompt: Option<String>,

    pub handover_enabled: Option<bool>,
    pub handover_keyword: Option<String>,
    pub handover_message: Option<String>,

    pub capture_name_enabled: Option<bool>,
    pub capture_email_enabled: Option<bool>,

    pub out_of_hours_reply_enabled: Option<bool>,
    pub out_of_hours_message: Option<String>,

    /// Working-hour boundaries as "HH:MM" strings, matching the admin form.
    pub work_hours_weekday_start: Option<String>,
    pub work_hours_weekday_end: Option<String>,
    pub work_hours_weekend_start: Option<String>,
    pub work_hours_weekend_end: Option<String>,

    /// Max messages one sender may deliver within the spam window.
    #[validate(range(min = 1, max = 1000))]
    pub spam_message_limit: Option<i32>,
    /// Spam window length in seconds.
    #[validate(range(min = 1, max = 86400))]
    pub spam_window_secs: Option<i32>,

    #[validate(url(message = "webhook_url must be a valid URL"))]
    pub webhook_url: Option<String>,
    #[validate(email(message = "notification_email must be a valid email"))]
    pub notification_email: Option<String>,
}

/// The flattened configuration consumed by the routing engine.
///
/// Built by [`crate::services::config_resolution::resolve_bot_config`];
/// profile values win over same-named settings keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BotConfig {
    pub default_reply: Option<String>,

    pub ai_enabled: bool,
    pub ai_prompt: Option<String>,

    pub handover_enabled: bool,
    pub handover_keyword: Option<String>,
    pub handover_message: Option<String>,

    pub out_of_hours_reply_enabled: bool,
    pub out_of_hours_message: Option<String>,

    pub work_hours_weekday_start: Option<String>,
    pub work_hours_weekday_end: Option<String>,
    pub work_hours_weekend_start: Option<String>,
    pub work_hours_weekend_end: Option<String>,

    pub spam_message_limit: Option<u32>,
    pub spam_window_secs: Option<u64>,
}

/// A profile row as returned by the admin API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BotProfileResponse {
    pub tenant_id: Uuid,
    #[serde(flatten)]
    pub profile: BotProfile,
    pub updated_at: DateTime<Utc>,
}
