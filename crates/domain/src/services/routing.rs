//! Message routing decision engine.
//!
//! Takes one inbound text message plus the tenant's resolved configuration
//! and produces exactly one outbound reply decision. Stages run strictly in
//! order and each either terminates with a reply or falls through:
//!
//! 1. Off-hours gate (only when the tenant enabled the off-hours auto-reply)
//! 2. Intent classification over the tenant's corpus
//! 3. Flow dispatch for the matched intent
//! 4. Handover keyword check
//! 5. AI fallback
//! 6. Default reply
//!
//! Store failures inside the engine degrade to fall-through; the engine
//! itself never fails, so the webhook handler always has a decision (or has
//! already bailed out before invoking it).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{BotConfig, FlowGraph, IntentWithExamples};
use crate::services::classifier;
use crate::services::flow_engine::{self, FlowOutcome};
use crate::services::office_hours;

/// Built-in reply when no default reply is configured.
pub const DEFAULT_FALLBACK_REPLY: &str = "Üzgünüm, sizi anlayamadım.";

/// Built-in reply when the off-hours message is unset.
pub const DEFAULT_OFF_HOURS_REPLY: &str = "Şu anda mesai saatleri dışındayız.";

/// Error from an engine collaborator's backing store.
#[derive(Debug, Error)]
#[error("Store error: {0}")]
pub struct StoreError(pub String);

/// Lazily loads one tenant's intent/example corpus.
///
/// The engine only calls this when routing actually reaches the
/// classification stage, so an off-hours short-circuit never touches it.
#[async_trait]
pub trait IntentCorpusSource: Send + Sync {
    async fn load_corpus(&self, tenant_id: Uuid) -> Result<Vec<IntentWithExamples>, StoreError>;
}

/// Looks up the flow triggered by an intent, matched case-insensitively.
#[async_trait]
pub trait FlowSource: Send + Sync {
    async fn find_flow(
        &self,
        tenant_id: Uuid,
        intent_name: &str,
    ) -> Result<Option<FlowGraph>, StoreError>;
}

/// Which stage produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingStage {
    OffHours,
    FlowMessage,
    FlowQuestion,
    Handover,
    Ai,
    Default,
}

impl RoutingStage {
    /// The webhook acknowledgment status string for this stage.
    pub fn status(&self) -> &'static str {
        match self {
            RoutingStage::OffHours => "PROCESSED_OFF_HOURS",
            RoutingStage::FlowMessage => "PROCESSED_FLOW_MESSAGE",
            RoutingStage::FlowQuestion => "PROCESSED_FLOW_QUESTION_ASKED",
            RoutingStage::Handover => "PROCESSED_HANDOVER",
            RoutingStage::Ai => "PROCESSED_AI",
            RoutingStage::Default => "PROCESSED_DEFAULT",
        }
    }
}

/// The single outbound message decision for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub reply: String,
    pub stage: RoutingStage,
}

/// The routing engine, generic over its two read-only collaborators.
pub struct RoutingEngine<C, F> {
    corpus_source: C,
    flow_source: F,
}

impl<C, F> RoutingEngine<C, F>
where
    C: IntentCorpusSource,
    F: FlowSource,
{
    pub fn new(corpus_source: C, flow_source: F) -> Self {
        Self {
            corpus_source,
            flow_source,
        }
    }

    /// Decides the reply for one inbound message.
    ///
    /// Every inbound message is evaluated independently; there is no
    /// conversation state between calls.
    pub async fn decide(
        &self,
        tenant_id: Uuid,
        config: &BotConfig,
        message: &str,
        now: DateTime<Utc>,
    ) -> RoutingDecision {
        // Stage 1: off-hours gate. Short-circuits before any data loading.
        if config.out_of_hours_reply_enabled && office_hours::is_off_hours(config, now) {
            return RoutingDecision {
                reply: config
                    .out_of_hours_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OFF_HOURS_REPLY.to_string()),
                stage: RoutingStage::OffHours,
            };
        }

        // Stage 2: intent classification. Corpus fetch failure degrades to
        // no-match so a broken intents table never aborts the pipeline.
        let classification = match self.corpus_source.load_corpus(tenant_id).await {
            Ok(corpus) => classifier::classify(&corpus, message),
            Err(err) => {
                warn!(%tenant_id, error = %err, "Corpus load failed, treating as no match");
                classifier::Classification::no_match()
            }
        };

        // Stage 3: flow dispatch. Absence and malformation are silent.
        if let Some(intent_name) = &classification.intent {
            if let Some(decision) = self.dispatch_flow(tenant_id, intent_name).await {
                return decision;
            }
        }

        // Stage 4: handover keyword.
        if config.handover_enabled {
            if let Some(keyword) = &config.handover_keyword {
                if !keyword.is_empty()
                    && message.to_lowercase().contains(&keyword.to_lowercase())
                {
                    return RoutingDecision {
                        reply: config
                            .handover_message
                            .clone()
                            .unwrap_or_else(|| DEFAULT_FALLBACK_REPLY.to_string()),
                        stage: RoutingStage::Handover,
                    };
                }
            }
        }

        // Stage 5: AI fallback.
        if config.ai_enabled {
            let reply = match &config.ai_prompt {
                Some(prompt) => prompt.clone(),
                None => format!("[AI reply]: {message}"),
            };
            return RoutingDecision {
                reply,
                stage: RoutingStage::Ai,
            };
        }

        // Stage 6: default reply.
        RoutingDecision {
            reply: config
                .default_reply
                .clone()
                .unwrap_or_else(|| DEFAULT_FALLBACK_REPLY.to_string()),
            stage: RoutingStage::Default,
        }
    }

    async fn dispatch_flow(&self, tenant_id: Uuid, intent_name: &str) -> Option<RoutingDecision> {
        let graph = match self.flow_source.find_flow(tenant_id, intent_name).await {
            Ok(Some(graph)) => graph,
            Ok(None) => {
                debug!(%tenant_id, intent = intent_name, "No flow for matched intent");
                return None;
            }
            Err(err) => {
                warn!(%tenant_id, intent = intent_name, error = %err, "Flow lookup failed");
                return None;
            }
        };

        match flow_engine::traverse(&graph) {
            FlowOutcome::ReplyMessage(text) => Some(RoutingDecision {
                reply: text,
                stage: RoutingStage::FlowMessage,
            }),
            FlowOutcome::ReplyQuestion(text) => Some(RoutingDecision {
                reply: text,
                stage: RoutingStage::FlowQuestion,
            }),
            outcome => {
                debug!(%tenant_id, intent = intent_name, ?outcome, "Flow did not emit a reply");
                None
            }
        }
    }
}
