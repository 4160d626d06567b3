//! Wire types for the processor's REST API.
//!
//! Hand-rolled serde types covering exactly the fields this service reads.
//! Unknown fields are ignored, so processor API additions never break
//! deserialization.

use std::collections::HashMap;

use serde::Deserialize;

/// A created checkout session, from `POST /v1/checkout/sessions`.
///
/// The client only yields sessions that came back with a redirect URL,
/// so `url` is not optional here.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Session identifier (`cs_...`), the key under which the order is
    /// stored and later matched when the completion webhook arrives.
    pub id: String,
    /// Hosted payment page the customer is redirected to.
    pub url: String,
}

/// A webhook event envelope.
///
/// `data.object` stays an untyped value until the event type is known;
/// only meaningful types get a second, typed deserialization pass.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    /// Event identifier (`evt_...`).
    pub id: String,
    /// Event type, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Unix timestamp the event was created.
    #[serde(default)]
    pub created: i64,
    /// Event payload.
    pub data: StripeEventData,
    /// Whether this event came from live mode.
    #[serde(default)]
    pub livemode: bool,
}

/// The `data` envelope of a webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    /// The API object the event describes.
    pub object: serde_json::Value,
}

/// A checkout session as delivered inside `checkout.session.completed`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionObject {
    /// Session identifier.
    pub id: String,
    /// Email the session was created with, if any.
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Details the customer entered on the hosted page.
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    /// Total in minor units, as charged.
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// The order metadata attached at session-creation time.
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl SessionObject {
    /// Best available customer email: hosted-page details first, then the
    /// email the session was created with.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .or(self.customer_email.as_deref())
    }
}

/// Customer details collected on the hosted payment page.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number, when phone collection is enabled.
    #[serde(default)]
    pub phone: Option<String>,
}

/// A charge as delivered inside `charge.succeeded`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeObject {
    /// Charge identifier (`ch_...`).
    pub id: String,
    /// Charged amount in minor units.
    pub amount: i64,
    /// Billing details from the payment method.
    #[serde(default)]
    pub billing_details: Option<BillingDetails>,
    /// Email the receipt was sent to, if any.
    #[serde(default)]
    pub receipt_email: Option<String>,
}

impl ChargeObject {
    /// Best available customer email: billing details first, then the
    /// receipt email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.billing_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .or(self.receipt_email.as_deref())
    }
}

/// Billing details attached to a charge.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingDetails {
    /// Cardholder name.
    #[serde(default)]
    pub name: Option<String>,
    /// Billing email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Error envelope the API returns with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// The interesting part of an API error.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}
