//! Outbound message transport abstraction.
//!
//! The routing pipeline decides what to say; something else delivers it.
//! The concrete WhatsApp Graph API client lives in the api crate.

use async_trait::async_trait;
use thiserror::Error;

/// Error type for outbound sends.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Messaging API rejected the request: {0}")]
    Api(String),

    #[error("Transport is not configured")]
    NotConfigured,
}

/// Delivers one outbound text message to a phone number.
///
/// `phone_number_id` selects the tenant's WhatsApp line the reply is sent
/// from. Implementations must not retry on failure; the pipeline treats a
/// failed send as a processing error for that single message only.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
    ) -> Result<(), SendError>;
}
