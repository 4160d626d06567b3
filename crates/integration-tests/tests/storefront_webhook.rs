//! Integration tests for the payment webhook endpoint.
//!
//! These drive `POST /webhook` through the full router: signature
//! verification over the raw body, event classification, per-session
//! deduplication, and notification dispatch against counting channels.

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use serde_json::json;

use fresca_core::{
    CustomerInfo, LineItem, Order, PaymentMethod, PricingConfig, compute_totals,
};

mod common;
use common::*;

/// An order parked in the repository, as checkout would leave it.
fn pending_order(email: &str) -> Order {
    let items = vec![LineItem {
        id: "margherita".to_string(),
        name: "Margherita".to_string(),
        description: None,
        unit_price: "11.50".parse().expect("decimal"),
        quantity: 2,
        category: None,
    }];
    let pricing = compute_totals(&items, PaymentMethod::Card, &PricingConfig::default());
    let customer = CustomerInfo {
        name: "Ana Diaz".to_string(),
        email: Some(email.to_string()),
        ..CustomerInfo::default()
    };
    Order::new(customer, items, pricing, PaymentMethod::Card)
}

fn completed_session_event(session_id: &str) -> serde_json::Value {
    json!({
        "id": "evt_test_1",
        "type": "checkout.session.completed",
        "created": 1724380000,
        "livemode": false,
        "data": {
            "object": {
                "id": session_id,
                "customer_details": {"email": "ana@example.com", "name": "Ana Diaz"},
                "amount_total": 2484
            }
        }
    })
}

// =============================================================================
// Signature Enforcement
// =============================================================================

#[tokio::test]
async fn test_missing_signature_is_rejected_without_dispatch() {
    let t = test_app();
    let payload = completed_session_event("cs_no_header");

    let response = post_json(&t.app, "/webhook", &payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"], "Webhook error: missing Stripe-Signature header",
        "error should say what was missing"
    );

    // A valid-looking event body must not cause any side effect
    assert_eq!(t.email.total_sends(), 0);
    assert_eq!(t.chat.paid.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_secret_signature_is_rejected() {
    let t = test_app();
    let payload = completed_session_event("cs_bad_sig");
    let signature = signature_header(
        payload.to_string().as_bytes(),
        "whsec_someOtherSigningSecret99",
    );

    let response = post_webhook(&t.app, &payload, &signature).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.email.total_sends(), 0);
}

#[tokio::test]
async fn test_tampered_body_is_rejected() {
    let t = test_app();
    let signed = completed_session_event("cs_original");
    let signature = signature_header(signed.to_string().as_bytes(), WEBHOOK_SECRET);

    // Deliver a different body under the original signature
    let tampered = completed_session_event("cs_tampered");
    let response = post_webhook(&t.app, &tampered, &signature).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.email.total_sends(), 0);
}

#[tokio::test]
async fn test_rejected_delivery_is_recorded_in_diagnostics() {
    let t = test_app();
    let payload = completed_session_event("cs_diag");

    let response = post_json(&t.app, "/webhook", &payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let logs = body_json(get(&t.app, "/webhook-logs").await).await;
    assert_eq!(logs["totalLogs"], 1);
    assert_eq!(logs["logs"][0]["event"], "signature.rejected");
    assert_eq!(
        logs["logs"][0]["outcome"], "missing Stripe-Signature header",
        "diagnostics should carry the rejection reason"
    );
}

#[tokio::test]
async fn test_unparseable_payload_is_rejected_after_verification() {
    let t = test_app();
    // Any bytes can carry a valid signature; parsing happens after
    let payload = json!({"this": "is not an event envelope"});

    let response = post_signed_webhook(&t.app, &payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .expect("error message")
            .contains("unparseable event payload"),
        "should report the parse failure"
    );
    assert_eq!(t.email.total_sends(), 0);
}

// =============================================================================
// Completed Checkout Sessions
// =============================================================================

#[tokio::test]
async fn test_completed_session_dispatches_notifications() {
    let t = test_app();
    t.state
        .orders()
        .put("cs_paid_1", pending_order("ana@example.com"))
        .await;

    let response = post_signed_webhook(&t.app, &completed_session_event("cs_paid_1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["received"], true);

    assert_eq!(t.email.confirmations.load(Ordering::SeqCst), 1);
    assert_eq!(t.email.notifications.load(Ordering::SeqCst), 1);
    assert_eq!(t.chat.paid.load(Ordering::SeqCst), 1);

    // The pending order has been consumed
    assert!(t.state.orders().get("cs_paid_1").await.is_none());
}

#[tokio::test]
async fn test_duplicate_delivery_dispatches_once() {
    let t = test_app();
    t.state
        .orders()
        .put("cs_redelivered", pending_order("ana@example.com"))
        .await;
    let payload = completed_session_event("cs_redelivered");

    let first = post_signed_webhook(&t.app, &payload).await;
    let second = post_signed_webhook(&t.app, &payload).await;

    // Both deliveries are acknowledged so the processor stops retrying
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(t.email.confirmations.load(Ordering::SeqCst), 1);
    assert_eq!(t.email.notifications.load(Ordering::SeqCst), 1);
    assert_eq!(t.chat.paid.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_order_rebuilt_from_session_metadata() {
    let t = test_app();
    // Nothing in the repository: simulates a restart between checkout
    // and webhook delivery. The metadata written at session creation is
    // the durable copy.
    let items_json = json!([{"name": "Margherita", "price": "11.50", "quantity": 2}]).to_string();
    let payload = json!({
        "id": "evt_meta_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_after_restart",
                "customer_details": {"email": "ana@example.com"},
                "metadata": {
                    "orderId": "ORD-1724380000000-9F3A2C1B",
                    "customerName": "Ana Diaz",
                    "items": items_json,
                    "subtotal": "23.00",
                    "tax": "1.84",
                    "total": "24.84"
                }
            }
        }
    });

    let response = post_signed_webhook(&t.app, &payload).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.email.confirmations.load(Ordering::SeqCst), 1);
    assert_eq!(t.email.notifications.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unrecoverable_metadata_is_acknowledged_without_dispatch() {
    let t = test_app();
    let payload = json!({
        "id": "evt_meta_bad",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_bad_metadata",
                "metadata": {"items": "certainly not json"}
            }
        }
    });

    let response = post_signed_webhook(&t.app, &payload).await;

    // The event itself is valid and a retry would carry the same
    // metadata, so it is acknowledged rather than redelivered forever
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["received"], true);
    assert_eq!(t.email.total_sends(), 0);

    let logs = body_json(get(&t.app, "/webhook-logs").await).await;
    assert!(
        logs["logs"][0]["outcome"]
            .as_str()
            .expect("outcome")
            .contains("order reconstruction failed"),
        "diagnostics should explain the skipped dispatch"
    );
}

#[tokio::test]
async fn test_malformed_session_object_is_bad_request() {
    let t = test_app();
    let payload = json!({
        "id": "evt_malformed",
        "type": "checkout.session.completed",
        "data": {"object": {"amount_total": 2484}}
    });

    let response = post_signed_webhook(&t.app, &payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.email.total_sends(), 0);
}

// =============================================================================
// Other Event Types
// =============================================================================

#[tokio::test]
async fn test_charge_succeeded_dispatches_notifications() {
    let t = test_app();
    let payload = json!({
        "id": "evt_charge_1",
        "type": "charge.succeeded",
        "data": {
            "object": {
                "id": "ch_test_1",
                "amount": 2500,
                "billing_details": {"name": "Ana Diaz", "email": "ana@example.com"}
            }
        }
    });

    let response = post_signed_webhook(&t.app, &payload).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.email.confirmations.load(Ordering::SeqCst), 1);
    assert_eq!(t.email.notifications.load(Ordering::SeqCst), 1);
    assert_eq!(t.chat.paid.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_charge_redelivery_dispatches_once() {
    let t = test_app();
    let payload = json!({
        "id": "evt_charge_2",
        "type": "charge.succeeded",
        "data": {
            "object": {"id": "ch_redelivered", "amount": 1800}
        }
    });

    let first = post_signed_webhook(&t.app, &payload).await;
    let second = post_signed_webhook(&t.app, &payload).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(t.email.notifications.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unhandled_event_type_is_acknowledged() {
    let t = test_app();
    let payload = json!({
        "id": "evt_other",
        "type": "payment_intent.created",
        "data": {"object": {"id": "pi_1"}}
    });

    let response = post_signed_webhook(&t.app, &payload).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["received"], true);
    assert_eq!(t.email.total_sends(), 0);

    let logs = body_json(get(&t.app, "/webhook-logs").await).await;
    assert_eq!(logs["logs"][0]["event"], "payment_intent.created");
    assert_eq!(logs["logs"][0]["outcome"], "ignored");
}
