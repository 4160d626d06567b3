//! Stripe REST integration: hosted checkout plus the signed webhook.
//!
//! [`StripeClient`] creates Checkout Sessions over the form-encoded v1
//! API; [`verify_signature`] authenticates incoming webhook deliveries
//! against the raw body before any payload parsing. The wire types
//! cover exactly the fields this service reads back from sessions,
//! charges, and events.
//!
//! A pending card order travels as session metadata, mirrored in the
//! in-process order repository until the completed-session event
//! arrives and turns it into notifications.

mod client;
mod error;
mod types;
mod webhook;

pub use client::StripeClient;
pub use error::{SignatureError, StripeError};
pub use types::{
    BillingDetails, ChargeObject, CheckoutSession, CustomerDetails, SessionObject, StripeEvent,
    StripeEventData,
};
pub use webhook::verify_signature;
