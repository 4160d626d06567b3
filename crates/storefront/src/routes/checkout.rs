//! Card checkout route handler.
//!
//! Validates the posted order, recomputes totals server-side, creates a
//! hosted checkout session with the payment processor, and parks the
//! order in the pending-order repository until the payment webhook
//! confirms it. No notifications fire here: the customer is only told
//! about an order once it is paid.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use fresca_core::{
    CustomerInfo, LineItem, Order, PaymentMethod, ValidationError, compute_totals, validate_order,
};

use crate::error::AppError;
use crate::state::AppState;

/// Checkout submission. Client-computed amounts may ride along in the
/// body; the server ignores all but `total`, which it checks against its
/// own arithmetic purely for drift diagnostics. `items` and
/// `customerInfo` default to empty so validation can name what is
/// missing instead of the deserializer rejecting the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub customer_info: CustomerInfo,
    #[serde(default)]
    pub total: Option<Decimal>,
}

/// Hosted checkout session handle returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Redirect target for the hosted payment page.
    pub url: String,
    /// Processor session id; the webhook correlates on this.
    pub session_id: String,
}

/// Create a hosted checkout session for a card order.
#[instrument(skip(state, body))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    validate_order(&body.items, &body.customer_info, PaymentMethod::Card)?;

    let pricing = compute_totals(&body.items, PaymentMethod::Card, &state.config().pricing);
    if let Some(client_total) = body.total
        && client_total != pricing.total
    {
        warn!(
            %client_total,
            server_total = %pricing.total,
            "Client-computed total disagrees with server arithmetic"
        );
    }

    let order = Order::new(body.customer_info, body.items, pricing, PaymentMethod::Card);
    // Guaranteed by validation above; stated again so a refactor there
    // cannot silently send an empty address to the processor.
    let Some(email) = order.customer.email().map(str::to_owned) else {
        return Err(ValidationError::MissingField("customerInfo.email").into());
    };

    crate::error::add_breadcrumb(
        "checkout",
        "Creating checkout session",
        Some(&[("order_id", order.order_id.as_str())]),
    );
    let session = state.stripe().create_checkout_session(&order, &email).await?;

    info!(
        session_id = %session.id,
        order_id = %order.order_id,
        total = %order.pricing.total,
        item_count = order.item_count(),
        "Checkout session created"
    );

    state.orders().put(&session.id, order).await;

    Ok(Json(CheckoutResponse {
        url: session.url,
        session_id: session.id,
    }))
}
