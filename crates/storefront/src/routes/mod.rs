//! Handlers for every route the storefront serves.
//!
//! # Endpoints
//!
//! ```text
//! # Orders & payment
//! POST /create-checkout-session - Create a hosted card checkout session
//! POST /cash-order              - Accept a cash order, notify the operator
//! POST /webhook                 - Payment processor webhook (signature-verified)
//!
//! # Cart (session-scoped)
//! GET    /cart            - Current cart
//! POST   /cart/items      - Add an item
//! PATCH  /cart/items/{id} - Set an entry's quantity (0 removes)
//! DELETE /cart/items/{id} - Remove an entry
//! DELETE /cart            - Empty the cart
//!
//! # Contact
//! POST /send-email - Relay a contact form submission
//!
//! # Diagnostics
//! GET /health       - Liveness + config presence report
//! GET /webhook-logs - Recent webhook-processing entries
//! ```

pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod orders;
pub mod webhook;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Session-cart routes, nested under `/cart`.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{id}",
            patch(cart::set_quantity).delete(cart::remove_item),
        )
}

/// Assemble the full route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/cash-order", post(orders::create_cash_order))
        .route("/webhook", post(webhook::handle_webhook))
        .route("/send-email", post(contact::send_contact_email))
        .nest("/cart", cart_routes())
        .route("/health", get(health::health))
        .route("/webhook-logs", get(health::webhook_logs))
}
