//! Bot profile repository for database operations.

use domain::models::BotProfile;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BotProfileEntity;
use crate::metrics::QueryTimer;

const PROFILE_COLUMNS: &str = "tenant_id, ai_enabled, ai_prompt, handover_enabled, \
     handover_keyword, handover_message, capture_name_enabled, capture_email_enabled, \
     out_of_hours_reply_enabled, out_of_hours_message, work_hours_weekday_start, \
     work_hours_weekday_end, work_hours_weekend_start, work_hours_weekend_end, \
     spam_message_limit, spam_window_secs, webhook_url, notification_email, updated_at";

/// Repository for behavioral profile database operations.
#[derive(Clone)]
pub struct BotProfileRepository {
    pool: PgPool,
}

impl BotProfileRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tenant's profile. A missing row is a legitimate state for a
    /// tenant that never saved the profile form.
    pub async fn find_by_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Option<BotProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_tenant");
        let entity = sqlx::query_as::<_, BotProfileEntity>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM bot_profiles
            WHERE tenant_id = $1
            "#,
        ))
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity)
    }

    /// Upsert the whole profile row for a tenant.
    ///
    /// The profile form always saves the complete record, so this writes
    /// every column rather than patching.
    pub async fn upsert(
        &self,
        tenant_id: Uuid,
        profile: &BotProfile,
    ) -> Result<BotProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_profile");
        let entity = sqlx::query_as::<_, BotProfileEntity>(&format!(
            r#"
            INSERT INTO bot_profiles (
                tenant_id, ai_enabled, ai_prompt, handover_enabled, handover_keyword,
                handover_message, capture_name_enabled, capture_email_enabled,
                out_of_hours_reply_enabled, out_of_hours_message,
                work_hours_weekday_start, work_hours_weekday_end,
                work_hours_weekend_start, work_hours_weekend_end,
                spam_message_limit, spam_window_secs, webhook_url, notification_email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (tenant_id) DO UPDATE SET
                ai_enabled = EXCLUDED.ai_enabled,
                ai_prompt = EXCLUDED.ai_prompt,
                handover_enabled = EXCLUDED.handover_enabled,
                handover_keyword = EXCLUDED.handover_keyword,
                handover_message = EXCLUDED.handover_message,
                capture_name_enabled = EXCLUDED.capture_name_enabled,
                capture_email_enabled = EXCLUDED.capture_email_enabled,
                out_of_hours_reply_enabled = EXCLUDED.out_of_hours_reply_enabled,
                out_of_hours_message = EXCLUDED.out_of_hours_message,
                work_hours_weekday_start = EXCLUDED.work_hours_weekday_start,
                work_hours_weekday_end = EXCLUDED.work_hours_weekday_end,
                work_hours_weekend_start = EXCLUDED.work_hours_weekend_start,
                work_hours_weekend_end = EXCLUDED.work_hours_weekend_end,
                spam_message_limit = EXCLUDED.spam_message_limit,
                spam_window_secs = EXCLUDED.spam_window_secs,
                webhook_url = EXCLUDED.webhook_url,
                notification_email = EXCLUDED.notification_email,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#,
        ))
        .bind(tenant_id)
        .bind(profile.ai_enabled)
        .bind(&profile.ai_prompt)
        .bind(profile.handover_enabled)
        .bind(&profile.handover_keyword)
        .bind(&profile.handover_message)
        .bind(profile.capture_name_enabled)
        .bind(profile.capture_email_enabled)
        .bind(profile.out_of_hours_reply_enabled)
        .bind(&profile.out_of_hours_message)
        .bind(&profile.work_hours_weekday_start)
        .bind(&profile.work_hours_weekday_end)
        .bind(&profile.work_hours_weekend_start)
        .bind(&profile.work_hours_weekend_end)
        .bind(profile.spam_message_limit)
        .bind(profile.spam_window_secs)
        .bind(&profile.webhook_url)
        .bind(&profile.notification_email)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(entity)
    }
}
