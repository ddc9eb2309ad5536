//! Domain services.

pub mod classifier;
pub mod config_resolution;
pub mod flow_engine;
pub mod office_hours;
pub mod routing;
pub mod transport;

pub use classifier::{classify, Classification, CONFIDENCE_THRESHOLD};
pub use config_resolution::resolve_bot_config;
pub use flow_engine::{traverse, FlowOutcome};
pub use office_hours::is_off_hours;
pub use routing::{
    FlowSource, IntentCorpusSource, RoutingDecision, RoutingEngine, RoutingStage, StoreError,
};
pub use transport::{MessageSender, SendError};
