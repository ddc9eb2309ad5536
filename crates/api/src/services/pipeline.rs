//! Inbound message processing pipeline.
//!
//! Glues the webhook route to the routing engine: tenant lookup by phone
//! number id, config resolution, spam guard, routing decision and the
//! outbound send. Every step maps to an acknowledgment status string that
//! the webhook returns alongside HTTP 200.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use domain::models::FlowGraph;
use domain::services::{
    resolve_bot_config, FlowSource, IntentCorpusSource, MessageSender, RoutingEngine, StoreError,
};
use persistence::repositories::{
    BotFlowRepository, BotProfileRepository, BotSettingRepository, IntentRepository,
    TenantRepository,
};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::middleware::metrics::{record_routing_duration, record_webhook_event};
use crate::services::spam_guard::{SpamGuard, DEFAULT_WINDOW_SECS};

/// Acknowledgment status strings returned by the webhook.
pub mod status {
    pub const EVENT_IGNORED: &str = "EVENT_IGNORED";
    pub const TENANT_NOT_FOUND: &str = "TENANT_NOT_FOUND";
    pub const TENANT_INACTIVE: &str = "TENANT_INACTIVE";
    pub const SETTINGS_ERROR: &str = "SETTINGS_ERROR";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const ERROR_PROCESSING: &str = "ERROR_PROCESSING";
}

/// One inbound text message extracted from a webhook event.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// The tenant's WhatsApp line the message arrived on.
    pub phone_number_id: String,
    /// Sender's phone number.
    pub from: String,
    /// Message text.
    pub text: String,
}

/// Corpus source backed by the intents tables.
pub struct RepoCorpusSource {
    repo: IntentRepository,
}

#[async_trait::async_trait]
impl IntentCorpusSource for RepoCorpusSource {
    async fn load_corpus(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<domain::models::IntentWithExamples>, StoreError> {
        self.repo
            .load_corpus(tenant_id)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }
}

/// Flow source backed by the bot_flows table.
///
/// A stored document that no longer deserializes is treated as absent so
/// one corrupt flow cannot take down routing for its tenant.
pub struct RepoFlowSource {
    repo: BotFlowRepository,
}

#[async_trait::async_trait]
impl FlowSource for RepoFlowSource {
    async fn find_flow(
        &self,
        tenant_id: Uuid,
        intent_name: &str,
    ) -> Result<Option<FlowGraph>, StoreError> {
        let entity = self
            .repo
            .find_by_trigger(tenant_id, intent_name)
            .await
            .map_err(|e| StoreError(e.to_string()))?;

        match entity {
            Some(entity) => match serde_json::from_value::<FlowGraph>(entity.flow_data) {
                Ok(graph) => Ok(Some(graph)),
                Err(err) => {
                    warn!(
                        %tenant_id,
                        intent = intent_name,
                        error = %err,
                        "Stored flow document failed to deserialize"
                    );
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

/// Processes inbound messages end to end.
pub struct MessagePipeline {
    tenants: TenantRepository,
    settings: BotSettingRepository,
    profiles: BotProfileRepository,
    engine: RoutingEngine<RepoCorpusSource, RepoFlowSource>,
    sender: Arc<dyn MessageSender>,
    spam_guard: Arc<SpamGuard>,
}

impl MessagePipeline {
    pub fn new(pool: PgPool, sender: Arc<dyn MessageSender>, spam_guard: Arc<SpamGuard>) -> Self {
        let engine = RoutingEngine::new(
            RepoCorpusSource {
                repo: IntentRepository::new(pool.clone()),
            },
            RepoFlowSource {
                repo: BotFlowRepository::new(pool.clone()),
            },
        );

        Self {
            tenants: TenantRepository::new(pool.clone()),
            settings: BotSettingRepository::new(pool.clone()),
            profiles: BotProfileRepository::new(pool),
            engine,
            sender,
            spam_guard,
        }
    }

    /// Process one inbound message and return the acknowledgment status.
    ///
    /// Never returns an error: every failure mode collapses into a status
    /// string, and the webhook always acknowledges with HTTP 200.
    pub async fn process(&self, message: &InboundMessage) -> String {
        let start = Instant::now();
        let outcome = self.process_inner(message).await;
        record_routing_duration(start.elapsed().as_secs_f64());
        record_webhook_event(&outcome);
        outcome
    }

    async fn process_inner(&self, message: &InboundMessage) -> String {
        let tenant = match self
            .tenants
            .find_by_phone_number_id(&message.phone_number_id)
            .await
        {
            Ok(Some(tenant)) => tenant,
            Ok(None) => {
                warn!(
                    phone_number_id = %message.phone_number_id,
                    "No tenant registered for phone number id"
                );
                return status::TENANT_NOT_FOUND.to_string();
            }
            Err(err) => {
                warn!(error = %err, "Tenant lookup failed");
                return status::ERROR_PROCESSING.to_string();
            }
        };

        let now = Utc::now();
        if !tenant.is_operational(now) {
            info!(tenant_id = %tenant.id, "Tenant inactive or subscription expired");
            return status::TENANT_INACTIVE.to_string();
        }

        let settings = match self.settings.load_map(tenant.id).await {
            Ok(map) => map,
            Err(err) => {
                warn!(tenant_id = %tenant.id, error = %err, "Settings load failed");
                return status::SETTINGS_ERROR.to_string();
            }
        };

        let profile = match self.profiles.find_by_tenant(tenant.id).await {
            Ok(entity) => entity.map(domain::models::BotProfile::from),
            Err(err) => {
                warn!(tenant_id = %tenant.id, error = %err, "Profile load failed");
                return status::SETTINGS_ERROR.to_string();
            }
        };

        let config = resolve_bot_config(&settings, profile.as_ref());

        if let Some(limit) = config.spam_message_limit {
            let window =
                Duration::from_secs(config.spam_window_secs.unwrap_or(DEFAULT_WINDOW_SECS));
            if !self.spam_guard.check(tenant.id, &message.from, limit, window) {
                info!(
                    tenant_id = %tenant.id,
                    from = %message.from,
                    "Sender over the spam limit, dropping message"
                );
                return status::RATE_LIMITED.to_string();
            }
        }

        let decision = self
            .engine
            .decide(tenant.id, &config, &message.text, now)
            .await;

        info!(
            tenant_id = %tenant.id,
            stage = decision.stage.status(),
            "Routing decision made"
        );

        match self
            .sender
            .send_text(&message.phone_number_id, &message.from, &decision.reply)
            .await
        {
            Ok(()) => decision.stage.status().to_string(),
            Err(err) => {
                warn!(
                    tenant_id = %tenant.id,
                    from = %message.from,
                    error = %err,
                    "Outbound send failed"
                );
                status::ERROR_PROCESSING.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings_are_distinct() {
        let all = [
            status::EVENT_IGNORED,
            status::TENANT_NOT_FOUND,
            status::TENANT_INACTIVE,
            status::SETTINGS_ERROR,
            status::RATE_LIMITED,
            status::ERROR_PROCESSING,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_inbound_message_clone() {
        let msg = InboundMessage {
            phone_number_id: "123".into(),
            from: "905551112233".into(),
            text: "merhaba".into(),
        };
        assert_eq!(msg.clone().text, "merhaba");
    }
}
