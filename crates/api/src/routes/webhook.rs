//! Meta webhook endpoint handlers.
//!
//! GET handles the subscription verification handshake; POST receives
//! message events. POST always acknowledges with HTTP 200 once the
//! signature checks out, carrying the pipeline outcome as a status string,
//! so Meta never retries a delivery we have already seen.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::services::pipeline::{status, InboundMessage};

/// Signature header sent by Meta on every POST.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Query parameters of the verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Webhook event envelope. Only the fields the pipeline needs are modeled;
/// everything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
struct WebhookEntry {
    #[serde(default)]
    changes: Vec<WebhookChange>,
}

#[derive(Debug, Deserialize)]
struct WebhookChange {
    value: Option<ChangeValue>,
}

#[derive(Debug, Deserialize)]
struct ChangeValue {
    metadata: Option<ChangeMetadata>,
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct ChangeMetadata {
    phone_number_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    from: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<TextContent>,
}

#[derive(Debug, Deserialize)]
struct TextContent {
    body: Option<String>,
}

/// GET /api/webhook - subscription verification handshake.
///
/// Echoes the challenge when the mode is "subscribe" and the token matches
/// the configured secret; anything else is a plain 403.
pub async fn verify(State(state): State<AppState>, Query(params): Query<VerifyParams>) -> Response {
    let token_matches = params
        .verify_token
        .as_deref()
        .map(|t| t == state.config.whatsapp.verify_token)
        .unwrap_or(false);

    if params.mode.as_deref() == Some("subscribe") && token_matches {
        if let Some(challenge) = params.challenge {
            debug!("Webhook verification succeeded");
            return (StatusCode::OK, challenge).into_response();
        }
    }

    warn!(mode = ?params.mode, "Webhook verification rejected");
    (StatusCode::FORBIDDEN, "Forbidden").into_response()
}

/// POST /api/webhook - inbound message events.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let app_secret = &state.config.whatsapp.app_secret;
    if !app_secret.is_empty() {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !shared::crypto::verify_webhook_signature(app_secret, &body, signature) {
            warn!("Webhook signature verification failed");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Invalid webhook signature"
                })),
            )
                .into_response();
        }
    }

    let message = match serde_json::from_slice::<WebhookPayload>(&body) {
        Ok(payload) => extract_text_message(&payload),
        Err(err) => {
            debug!(error = %err, "Unparseable webhook payload");
            None
        }
    };

    let outcome = match message {
        Some(message) => state.pipeline.process(&message).await,
        None => {
            debug!("Webhook event carried no inbound text message");
            status::EVENT_IGNORED.to_string()
        }
    };

    (StatusCode::OK, Json(json!({ "status": outcome }))).into_response()
}

/// Pulls the first inbound text message out of the event envelope.
///
/// Status updates, media messages and malformed events all yield `None`.
fn extract_text_message(payload: &WebhookPayload) -> Option<InboundMessage> {
    let value = payload.entry.first()?.changes.first()?.value.as_ref()?;
    let phone_number_id = value.metadata.as_ref()?.phone_number_id.as_deref()?;
    let message = value.messages.first()?;

    if message.kind.as_deref() != Some("text") {
        return None;
    }

    let from = message.from.as_deref()?;
    let text = message.text.as_ref()?.body.as_deref()?;

    Some(InboundMessage {
        phone_number_id: phone_number_id.to_string(),
        from: from.to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_event() -> serde_json::Value {
        json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "1234",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "metadata": { "phone_number_id": "111222333" },
                        "messages": [{
                            "from": "905551112233",
                            "id": "wamid.x",
                            "type": "text",
                            "text": { "body": "merhaba" }
                        }]
                    }
                }]
            }]
        })
    }

    #[test]
    fn test_extract_text_message() {
        let payload: WebhookPayload = serde_json::from_value(text_event()).unwrap();
        let message = extract_text_message(&payload).unwrap();
        assert_eq!(message.phone_number_id, "111222333");
        assert_eq!(message.from, "905551112233");
        assert_eq!(message.text, "merhaba");
    }

    #[test]
    fn test_status_update_is_ignored() {
        let event = json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "metadata": { "phone_number_id": "111222333" },
                        "statuses": [{ "status": "delivered" }]
                    }
                }]
            }]
        });
        let payload: WebhookPayload = serde_json::from_value(event).unwrap();
        assert!(extract_text_message(&payload).is_none());
    }

    #[test]
    fn test_non_text_message_is_ignored() {
        let event = json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "metadata": { "phone_number_id": "111222333" },
                        "messages": [{
                            "from": "905551112233",
                            "type": "image",
                            "image": { "id": "media-id" }
                        }]
                    }
                }]
            }]
        });
        let payload: WebhookPayload = serde_json::from_value(event).unwrap();
        assert!(extract_text_message(&payload).is_none());
    }

    #[test]
    fn test_empty_envelope_is_ignored() {
        let payload: WebhookPayload = serde_json::from_value(json!({ "entry": [] })).unwrap();
        assert!(extract_text_message(&payload).is_none());
    }

    #[test]
    fn test_verify_params_deserialization() {
        let params: VerifyParams = serde_json::from_value(json!({
            "hub.mode": "subscribe",
            "hub.verify_token": "sekret",
            "hub.challenge": "42"
        }))
        .unwrap();
        assert_eq!(params.mode.as_deref(), Some("subscribe"));
        assert_eq!(params.verify_token.as_deref(), Some("sekret"));
        assert_eq!(params.challenge.as_deref(), Some("42"));
    }
}
