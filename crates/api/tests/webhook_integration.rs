//! Integration tests for the Meta webhook endpoint.
//!
//! Each test seeds its own tenant under a unique phone number id so the
//! tests can run in parallel against a shared database.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{
    create_test_app, create_test_pool, parse_response_body, run_migrations, seed_intent,
    seed_message_flow, seed_setting, seed_tenant, signed_webhook_post, test_config,
    test_config_with_app_secret, text_message_event, webhook_post, RecordingSender,
};
use tower::ServiceExt;
use uuid::Uuid;

fn unique_channel() -> String {
    format!("chan-{}", Uuid::new_v4().simple())
}

// ============================================================================
// Verification handshake
// ============================================================================

#[tokio::test]
async fn test_verify_handshake_success() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool, RecordingSender::new());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/webhook?hub.mode=subscribe&hub.verify_token=test-verify-token&hub.challenge=12345")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"12345");
}

#[tokio::test]
async fn test_verify_handshake_wrong_token() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool, RecordingSender::new());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=12345")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_verify_handshake_wrong_mode() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool, RecordingSender::new());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/webhook?hub.mode=unsubscribe&hub.verify_token=test-verify-token&hub.challenge=1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Message events
// ============================================================================

#[tokio::test]
async fn test_unknown_channel_acknowledged_as_tenant_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let sender = RecordingSender::new();
    let app = create_test_app(test_config(), pool, sender.clone());

    let event = text_message_event(&unique_channel(), "905551112233", "merhaba");
    let response = app.oneshot(webhook_post(&event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "TENANT_NOT_FOUND");
    assert!(sender.sent_messages().is_empty());
}

#[tokio::test]
async fn test_inactive_tenant_is_skipped() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let channel = unique_channel();
    let tenant_id = seed_tenant(&pool, "Inactive Co", &channel).await;
    common::deactivate_tenant(&pool, tenant_id).await;

    let sender = RecordingSender::new();
    let app = create_test_app(test_config(), pool, sender.clone());

    let event = text_message_event(&channel, "905551112233", "merhaba");
    let response = app.oneshot(webhook_post(&event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "TENANT_INACTIVE");
    assert!(sender.sent_messages().is_empty());
}

#[tokio::test]
async fn test_default_reply_when_nothing_matches() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let channel = unique_channel();
    let tenant_id = seed_tenant(&pool, "Acme", &channel).await;
    seed_setting(&pool, tenant_id, "default_reply", "Anlayamadım, tekrar eder misiniz?").await;

    let sender = RecordingSender::new();
    let app = create_test_app(test_config(), pool, sender.clone());

    let event = text_message_event(&channel, "905551112233", "xyzqwk");
    let response = app.oneshot(webhook_post(&event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "PROCESSED_DEFAULT");

    let sent = sender.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].phone_number_id, channel);
    assert_eq!(sent[0].to, "905551112233");
    assert_eq!(sent[0].body, "Anlayamadım, tekrar eder misiniz?");
}

#[tokio::test]
async fn test_flow_message_reply_for_matched_intent() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let channel = unique_channel();
    let tenant_id = seed_tenant(&pool, "Flow Co", &channel).await;
    seed_intent(&pool, tenant_id, "greeting", &["merhaba", "selam"]).await;
    seed_message_flow(&pool, tenant_id, "greeting", "Hoş geldiniz!").await;

    let sender = RecordingSender::new();
    let app = create_test_app(test_config(), pool, sender.clone());

    let event = text_message_event(&channel, "905551112233", "merhaba");
    let response = app.oneshot(webhook_post(&event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "PROCESSED_FLOW_MESSAGE");

    let sent = sender.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "Hoş geldiniz!");
}

#[tokio::test]
async fn test_duplicate_delivery_replies_twice() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let channel = unique_channel();
    let tenant_id = seed_tenant(&pool, "Redelivery Co", &channel).await;
    seed_setting(&pool, tenant_id, "default_reply", "Tekrar hoş geldiniz").await;

    let sender = RecordingSender::new();
    let app = create_test_app(test_config(), pool, sender.clone());

    // The platform may redeliver an event it already delivered. There is no
    // deduplication: each delivery is processed independently and replied to.
    let event = text_message_event(&channel, "905551112233", "aynı mesaj");
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(webhook_post(&event))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response).await;
        assert_eq!(body["status"], "PROCESSED_DEFAULT");
    }

    let sent = sender.sent_messages();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[tokio::test]
async fn test_status_event_is_ignored() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let sender = RecordingSender::new();
    let app = create_test_app(test_config(), pool, sender.clone());

    let event = serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{
                "value": {
                    "metadata": { "phone_number_id": unique_channel() },
                    "statuses": [{ "status": "delivered" }]
                }
            }]
        }]
    });

    let response = app.oneshot(webhook_post(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "EVENT_IGNORED");
    assert!(sender.sent_messages().is_empty());
}

#[tokio::test]
async fn test_send_failure_acknowledged_as_error() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let channel = unique_channel();
    seed_tenant(&pool, "Broken Send Co", &channel).await;

    let sender = RecordingSender::failing();
    let app = create_test_app(test_config(), pool, sender);

    let event = text_message_event(&channel, "905551112233", "merhaba");
    let response = app.oneshot(webhook_post(&event)).await.unwrap();

    // Still HTTP 200 so the platform does not retry the delivery.
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ERROR_PROCESSING");
}

// ============================================================================
// Signature verification
// ============================================================================

#[tokio::test]
async fn test_unsigned_post_rejected_when_secret_configured() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(
        test_config_with_app_secret("app-secret"),
        pool,
        RecordingSender::new(),
    );

    let event = text_message_event(&unique_channel(), "905551112233", "merhaba");
    let response = app.oneshot(webhook_post(&event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signed_post_accepted() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(
        test_config_with_app_secret("app-secret"),
        pool,
        RecordingSender::new(),
    );

    let event = text_message_event(&unique_channel(), "905551112233", "merhaba");
    let response = app
        .oneshot(signed_webhook_post(&event, "app-secret"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "TENANT_NOT_FOUND");
}

#[tokio::test]
async fn test_wrongly_signed_post_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(
        test_config_with_app_secret("app-secret"),
        pool,
        RecordingSender::new(),
    );

    let event = text_message_event(&unique_channel(), "905551112233", "merhaba");
    let response = app
        .oneshot(signed_webhook_post(&event, "other-secret"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
