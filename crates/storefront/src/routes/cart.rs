//! Cart route handlers.
//!
//! The cart lives in the client session: every mutation snapshots the
//! whole cart back into the session under a fixed key, and every request
//! rehydrates it verbatim. Items are stored at the price the client
//! posted; totals are recomputed server-side at checkout time, so a stale
//! cart price never reaches the payment processor.

use axum::{Json, extract::Path};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use fresca_core::{Cart, LineItem};

use crate::error::AppError;

/// Session key the cart snapshot is stored under.
pub(crate) const CART_SESSION_KEY: &str = "cart";

/// Cart payload returned by every cart endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    /// Items in display order.
    pub items: Vec<LineItem>,
    /// Total unit count across all entries.
    pub item_count: u32,
}

impl CartResponse {
    fn from_cart(cart: Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            items: cart.into_items(),
        }
    }
}

/// Quantity update for one cart entry.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Rehydrate the cart from the session, defaulting to empty.
///
/// The snapshot replays through [`Cart::from_items`], which drops any
/// persisted entry that violates the quantity invariant.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    let items = session
        .get::<Vec<LineItem>>(CART_SESSION_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    Cart::from_items(items)
}

/// Snapshot the cart back into the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session
        .insert(CART_SESSION_KEY, cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist cart: {e}")))
}

/// Drop the session cart. Best-effort: a failure here is logged, never
/// surfaced, because the callers have already accepted the order.
pub(crate) async fn clear_cart(session: &Session) {
    if let Err(e) = session.remove::<Cart>(CART_SESSION_KEY).await {
        tracing::warn!("Failed to clear session cart: {e}");
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the current session cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartResponse> {
    let cart = load_cart(&session).await;
    Json(CartResponse::from_cart(cart))
}

/// Add an item. Re-adding an id grows the existing entry's quantity.
#[instrument(skip(session, item), fields(item_id = %item.id))]
pub async fn add_item(
    session: Session,
    Json(item): Json<LineItem>,
) -> Result<Json<CartResponse>, AppError> {
    item.validate()?;

    let mut cart = load_cart(&session).await;
    cart.add(item);
    save_cart(&session, &cart).await?;

    Ok(Json(CartResponse::from_cart(cart)))
}

/// Overwrite an entry's quantity. Zero removes the entry; unknown ids are
/// a no-op, the response describes whatever the cart now holds.
#[instrument(skip(session, body))]
pub async fn set_quantity(
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<SetQuantityRequest>,
) -> Result<Json<CartResponse>, AppError> {
    let mut cart = load_cart(&session).await;
    cart.set_quantity(&id, body.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartResponse::from_cart(cart)))
}

/// Remove an entry. Unknown ids are a no-op.
#[instrument(skip(session))]
pub async fn remove_item(
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<CartResponse>, AppError> {
    let mut cart = load_cart(&session).await;
    cart.remove(&id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartResponse::from_cart(cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartResponse>, AppError> {
    let cart = Cart::new();
    save_cart(&session, &cart).await?;

    Ok(Json(CartResponse::from_cart(cart)))
}
