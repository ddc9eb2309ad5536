//! Bot profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::BotProfile;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the bot_profiles table.
///
/// One row per tenant at most. Columns are nullable so the settings-page
/// fallback applies whenever a field was never set.
#[derive(Debug, Clone, FromRow)]
pub struct BotProfileEntity {
    pub tenant_id: Uuid,

    pub ai_enabled: Option<bool>,
    pub ai_prompt: Option<String>,

    pub handover_enabled: Option<bool>,
    pub handover_keyword: Option<String>,
    pub handover_message: Option<String>,

    pub capture_name_enabled: Option<bool>,
    pub capture_email_enabled: Option<bool>,

    pub out_of_hours_reply_enabled: Option<bool>,
    pub out_of_hours_message: Option<String>,

    pub work_hours_weekday_start: Option<String>,
    pub work_hours_weekday_end: Option<String>,
    pub work_hours_weekend_start: Option<String>,
    pub work_hours_weekend_end: Option<String>,

    pub spam_message_limit: Option<i32>,
    pub spam_window_secs: Option<i32>,

    pub webhook_url: Option<String>,
    pub notification_email: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl From<BotProfileEntity> for BotProfile {
    fn from(e: BotProfileEntity) -> Self {
        BotProfile {
            ai_enabled: e.ai_enabled,
            ai_prompt: e.ai_prompt,
            handover_enabled: e.handover_enabled,
            handover_keyword: e.handover_keyword,
            handover_message: e.handover_message,
            capture_name_enabled: e.capture_name_enabled,
            capture_email_enabled: e.capture_email_enabled,
            out_of_hours_reply_enabled: e.out_of_hours_reply_enabled,
            out_of_hours_message: e.out_of_hours_message,
            work_hours_weekday_start: e.work_hours_weekday_start,
            work_hours_weekday_end: e.work_hours_weekday_end,
            work_hours_weekend_start: e.work_hours_weekend_start,
            work_hours_weekend_end: e.work_hours_weekend_end,
            spam_message_limit: e.spam_message_limit,
            spam_window_secs: e.spam_window_secs,
            webhook_url: e.webhook_url,
            notification_email: e.notification_email,
        }
    }
}
