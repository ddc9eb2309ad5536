//! WhatsApp Cloud API client.
//!
//! Implements the MessageSender trait by posting text messages to the
//! Graph API `/{phone_number_id}/messages` endpoint.

use std::time::Duration;

use domain::services::{MessageSender, SendError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::WhatsAppConfig;
use crate::middleware::metrics::record_message_sent;

/// Outbound message client backed by the WhatsApp Cloud API.
pub struct WhatsAppSender {
    client: Client,
    config: WhatsAppConfig,
}

/// Graph API text message request body.
#[derive(Debug, Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    preview_url: bool,
    body: &'a str,
}

/// Graph API error response envelope.
#[derive(Debug, Deserialize)]
struct GraphErrorResponse {
    error: GraphErrorDetails,
}

#[derive(Debug, Deserialize)]
struct GraphErrorDetails {
    message: String,
    #[serde(default)]
    code: i64,
}

impl WhatsAppSender {
    /// Create a new sender from configuration.
    pub fn new(config: WhatsAppConfig) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.send_timeout_ms))
            .build()
            .map_err(|e| SendError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self, phone_number_id: &str) -> String {
        format!(
            "{}/{}/messages",
            self.config.api_base_url.trim_end_matches('/'),
            phone_number_id
        )
    }
}

#[async_trait::async_trait]
impl MessageSender for WhatsAppSender {
    async fn send_text(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
    ) -> Result<(), SendError> {
        if self.config.access_token.is_empty() {
            return Err(SendError::NotConfigured);
        }

        let request = TextMessageRequest {
            messaging_product: "whatsapp",
            to,
            message_type: "text",
            text: TextBody {
                preview_url: false,
                body,
            },
        };

        let response = self
            .client
            .post(self.messages_url(phone_number_id))
            .bearer_auth(&self.config.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                record_message_sent(false);
                SendError::Transport(e.to_string())
            })?;

        if response.status().is_success() {
            tracing::debug!(
                phone_number_id = %phone_number_id,
                to = %to,
                "WhatsApp message sent"
            );
            record_message_sent(true);
            return Ok(());
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        record_message_sent(false);

        let detail = match serde_json::from_str::<GraphErrorResponse>(&text) {
            Ok(parsed) => format!("{} (code {})", parsed.error.message, parsed.error.code),
            Err(_) => text,
        };

        tracing::warn!(
            phone_number_id = %phone_number_id,
            to = %to,
            status = %status,
            "WhatsApp send failed: {}",
            detail
        );

        Err(SendError::Api(format!("{status}: {detail}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WhatsAppConfig {
        WhatsAppConfig {
            verify_token: "verify".into(),
            access_token: "token".into(),
            app_secret: String::new(),
            api_base_url: "https://graph.facebook.com/v19.0".into(),
            send_timeout_ms: 1000,
        }
    }

    #[test]
    fn test_messages_url() {
        let sender = WhatsAppSender::new(test_config()).unwrap();
        assert_eq!(
            sender.messages_url("123456"),
            "https://graph.facebook.com/v19.0/123456/messages"
        );
    }

    #[test]
    fn test_messages_url_trailing_slash() {
        let mut config = test_config();
        config.api_base_url = "https://graph.facebook.com/v19.0/".into();
        let sender = WhatsAppSender::new(config).unwrap();
        assert_eq!(
            sender.messages_url("123456"),
            "https://graph.facebook.com/v19.0/123456/messages"
        );
    }

    #[test]
    fn test_text_request_serialization() {
        let request = TextMessageRequest {
            messaging_product: "whatsapp",
            to: "905551112233",
            message_type: "text",
            text: TextBody {
                preview_url: false,
                body: "Merhaba",
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messaging_product"], "whatsapp");
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"]["preview_url"], false);
        assert_eq!(json["text"]["body"], "Merhaba");
    }

    #[tokio::test]
    async fn test_send_without_access_token() {
        let mut config = test_config();
        config.access_token = String::new();
        let sender = WhatsAppSender::new(config).unwrap();

        let result = sender.send_text("123", "905551112233", "hi").await;
        assert!(matches!(result, Err(SendError::NotConfigured)));
    }
}
