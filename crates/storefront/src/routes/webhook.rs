//! Payment webhook route handler.
//!
//! Receives the processor's asynchronous payment events. The flow is
//! strict: without a verified signature nothing else happens — the body
//! is not parsed and no side effect runs. Verified events are classified,
//! deduplicated per session so processor redeliveries cannot double-send
//! notifications, and acknowledged with 200 regardless of how the
//! notification dispatch itself went.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use fresca_core::{Order, types::money};

use crate::error::AppError;
use crate::state::AppState;
use crate::stripe::{ChargeObject, SessionObject, SignatureError, StripeEvent};

/// Acknowledgement returned for every verified event.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Handle a payment processor webhook delivery.
#[instrument(skip(state, headers, body))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    // No signature, no parse: the raw body stays untouched.
    let Some(signature) = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
    else {
        state
            .webhook_log()
            .record("signature.rejected", None, "missing Stripe-Signature header");
        return Err(SignatureError::MissingHeader.into());
    };

    if let Err(err) = state.stripe().verify_webhook_signature(signature, &body) {
        warn!(error = %err, "Webhook signature verification failed");
        state
            .webhook_log()
            .record("signature.rejected", None, &err.to_string());
        return Err(err.into());
    }

    let event: StripeEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            state
                .webhook_log()
                .record("payload.rejected", None, &e.to_string());
            return Err(AppError::BadRequest(format!("unparseable event payload: {e}")));
        }
    };

    debug!(
        event_id = %event.id,
        event_type = %event.event_type,
        livemode = event.livemode,
        "Webhook event verified"
    );

    match event.event_type.as_str() {
        "checkout.session.completed" => handle_session_completed(&state, event.data.object).await?,
        "charge.succeeded" => handle_charge_succeeded(&state, event.data.object).await?,
        other => {
            // Unhandled types are acknowledged, not errors; the processor
            // sends whatever the account is subscribed to.
            debug!(event_type = %other, "Ignoring unhandled webhook event type");
            state.webhook_log().record(other, None, "ignored");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}

/// Process `checkout.session.completed`, the primary payment signal.
async fn handle_session_completed(
    state: &AppState,
    object: serde_json::Value,
) -> Result<(), AppError> {
    let session: SessionObject = match serde_json::from_value(object) {
        Ok(session) => session,
        Err(e) => {
            state.webhook_log().record(
                "checkout.session.completed",
                None,
                &format!("malformed session object: {e}"),
            );
            return Err(AppError::BadRequest(format!(
                "malformed checkout session object: {e}"
            )));
        }
    };

    info!(
        session_id = %session.id,
        amount_total = ?session.amount_total,
        "Payment completed"
    );
    crate::error::add_breadcrumb(
        "webhook",
        "Payment completed",
        Some(&[("session_id", session.id.as_str())]),
    );

    if !state.dedup().first_delivery(&session.id).await {
        debug!(session_id = %session.id, "Duplicate webhook delivery, skipping dispatch");
        state.webhook_log().record(
            "checkout.session.completed",
            Some(&session.id),
            "duplicate delivery, skipped",
        );
        return Ok(());
    }

    let order = match state.orders().get(&session.id).await {
        Some(order) => order,
        None => {
            // The in-process repository does not survive restarts; the
            // metadata attached at session creation is the durable copy.
            let metadata = session.metadata.clone().unwrap_or_default();
            match Order::from_session_metadata(&metadata, &session.id, session.email()) {
                Ok(order) => order,
                Err(err) => {
                    warn!(
                        session_id = %session.id,
                        error = %err,
                        "Order reconstruction from session metadata failed"
                    );
                    state.webhook_log().record(
                        "checkout.session.completed",
                        Some(&session.id),
                        &format!("order reconstruction failed: {err}"),
                    );
                    return Ok(());
                }
            }
        }
    };

    let summary = state.notifier().notify_paid_order(&order).await;
    state.orders().remove(&session.id).await;
    state.webhook_log().record(
        "checkout.session.completed",
        Some(&session.id),
        &summary.describe(),
    );

    Ok(())
}

/// Process `charge.succeeded`, the fallback signal: only billing details
/// and the charged amount are available, so the notification carries a
/// single synthetic line at the full amount.
async fn handle_charge_succeeded(
    state: &AppState,
    object: serde_json::Value,
) -> Result<(), AppError> {
    let charge: ChargeObject = match serde_json::from_value(object) {
        Ok(charge) => charge,
        Err(e) => {
            state.webhook_log().record(
                "charge.succeeded",
                None,
                &format!("malformed charge object: {e}"),
            );
            return Err(AppError::BadRequest(format!("malformed charge object: {e}")));
        }
    };

    info!(charge_id = %charge.id, amount = charge.amount, "Charge succeeded");

    if !state.dedup().first_delivery(&charge.id).await {
        debug!(charge_id = %charge.id, "Duplicate webhook delivery, skipping dispatch");
        state.webhook_log().record(
            "charge.succeeded",
            Some(&charge.id),
            "duplicate delivery, skipped",
        );
        return Ok(());
    }

    let name = charge
        .billing_details
        .as_ref()
        .and_then(|d| d.name.as_deref());
    let order = Order::from_charge(money::from_minor_units(charge.amount), name, charge.email());

    let summary = state.notifier().notify_paid_order(&order).await;
    state
        .webhook_log()
        .record("charge.succeeded", Some(&charge.id), &summary.describe());

    Ok(())
}
