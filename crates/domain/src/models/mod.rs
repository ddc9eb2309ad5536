//! Domain model definitions.

pub mod bot_config;
pub mod flow;
pub mod intent;
pub mod tenant;

pub use bot_config::{BotConfig, BotProfile, BotProfileResponse};
pub use flow::{FlowEdge, FlowGraph, FlowNode, NodeData, NodeKind, NodePosition};
pub use intent::{
    AddExampleRequest, CreateIntentRequest, Intent, IntentExample, IntentWithExamples,
};
pub use tenant::{CreateTenantRequest, Tenant, TenantResponse, UpdateTenantRequest};
