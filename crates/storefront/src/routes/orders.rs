//! Cash order route handler.
//!
//! Cash orders skip the payment processor entirely: the order is accepted
//! immediately and the operator is pinged over chat so the kitchen knows
//! to collect cash on handoff. The chat message is best-effort — a
//! missing bot configuration or a failed send downgrades the response
//! message but never rejects the order.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use fresca_core::{CustomerInfo, LineItem, Order, PaymentMethod, compute_totals, validate_order};

use crate::error::AppError;
use crate::notify::CashNotifyOutcome;
use crate::routes::cart::clear_cart;
use crate::state::AppState;

/// Cash order submission. As with checkout, client-computed amounts are
/// advisory; only `total` is read, for drift diagnostics.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashOrderRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub customer_info: CustomerInfo,
    #[serde(default)]
    pub total: Option<Decimal>,
}

/// Acceptance receipt for a cash order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashOrderResponse {
    pub success: bool,
    /// Human-readable acceptance message; notes when the operator was
    /// not notified.
    pub message: &'static str,
    pub order_id: String,
}

/// Accept a cash order and notify the operator chat.
#[instrument(skip(state, session, body))]
pub async fn create_cash_order(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CashOrderRequest>,
) -> Result<Json<CashOrderResponse>, AppError> {
    validate_order(&body.items, &body.customer_info, PaymentMethod::Cash)?;

    let pricing = compute_totals(&body.items, PaymentMethod::Cash, &state.config().pricing);
    if let Some(client_total) = body.total
        && client_total != pricing.total
    {
        warn!(
            %client_total,
            server_total = %pricing.total,
            "Client-computed total disagrees with server arithmetic"
        );
    }

    let order = Order::new(body.customer_info, body.items, pricing, PaymentMethod::Cash);
    info!(
        order_id = %order.order_id,
        total = %order.pricing.total,
        item_count = order.item_count(),
        "Cash order accepted"
    );

    let outcome = state.notifier().notify_cash_order(&order).await;
    let message = match outcome {
        CashNotifyOutcome::Sent => "Order received",
        CashNotifyOutcome::Failed => "Order received (notification failed)",
        CashNotifyOutcome::NotConfigured => "Order received (no notification sent)",
    };

    // The order is in; the customer's cart has served its purpose.
    clear_cart(&session).await;

    Ok(Json(CashOrderResponse {
        success: true,
        message,
        order_id: order.order_id,
    }))
}
