//! Stripe Checkout API client.
//!
//! Creates hosted checkout sessions and verifies webhook signatures. The
//! two endpoints this service needs are called directly over HTTPS with
//! form-encoded bodies rather than through an SDK crate.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, error, instrument};

use fresca_core::Order;
use fresca_core::types::money;

use crate::config::{CheckoutConfig, StripeConfig};

use super::error::{SignatureError, StripeError};
use super::types::{ApiErrorResponse, CheckoutSession};
use super::webhook;

/// Stripe REST API base URL.
const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Client for creating checkout sessions and verifying webhooks.
#[derive(Clone)]
pub struct StripeClient {
    /// HTTP client.
    client: Client,
    /// Secret API key for authentication.
    secret_key: SecretString,
    /// Endpoint signing secret for verifying webhooks.
    webhook_secret: SecretString,
    /// Session parameters: currency, redirect URLs, tax itemization.
    checkout: CheckoutConfig,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("checkout", &self.checkout)
            .finish_non_exhaustive()
    }
}

/// A session as the API returns it; `url` is promoted to required in
/// [`CheckoutSession`] once presence is checked.
#[derive(Debug, Deserialize)]
struct CreatedSession {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

impl StripeClient {
    /// Create a new Stripe client.
    #[must_use]
    pub fn new(config: &StripeConfig, checkout: CheckoutConfig) -> Self {
        Self {
            client: Client::new(),
            secret_key: config.secret_key.clone(),
            webhook_secret: config.webhook_secret.clone(),
            checkout,
        }
    }

    /// Create a hosted checkout session for a card order.
    ///
    /// The order's full metadata encoding travels with the session, so the
    /// completion webhook can rebuild the order even if this process has
    /// restarted in between.
    ///
    /// # Errors
    ///
    /// Returns error if an amount is out of range, the request fails, or
    /// the API rejects the session.
    #[instrument(skip(self, order, email), fields(order_id = %order.order_id))]
    pub async fn create_checkout_session(
        &self,
        order: &Order,
        email: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let form = build_session_form(order, email, &self.checkout)?;

        let response = self
            .client
            .post(format!("{STRIPE_API_BASE}/checkout/sessions"))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await
            .map_err(|e| StripeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "unknown error".to_string());
            error!(
                status = status.as_u16(),
                error = %message,
                "Stripe rejected checkout session"
            );
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: CreatedSession = response
            .json()
            .await
            .map_err(|e| StripeError::Response(e.to_string()))?;

        let Some(url) = session.url else {
            return Err(StripeError::Response(
                "checkout session has no redirect url".to_string(),
            ));
        };

        debug!(session_id = %session.id, "Checkout session created");

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    /// Verify a webhook delivery's `Stripe-Signature` header against the
    /// raw request body.
    ///
    /// # Errors
    ///
    /// Returns error if the header is malformed, stale, or does not match.
    pub fn verify_webhook_signature(
        &self,
        header: &str,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        webhook::verify_signature(&self.webhook_secret, header, body)
    }
}

/// Encode an order as `checkout/sessions` form parameters.
///
/// The API takes bracketed keys (`line_items[0][price_data][unit_amount]`)
/// with amounts in minor units. Metadata pairs are emitted sorted by key
/// so the encoding is deterministic.
fn build_session_form(
    order: &Order,
    email: &str,
    checkout: &CheckoutConfig,
) -> Result<Vec<(String, String)>, StripeError> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("payment_method_types[0]".into(), "card".into()),
        ("customer_email".into(), email.to_string()),
        ("phone_number_collection[enabled]".into(), "true".into()),
        ("success_url".into(), checkout.success_url.clone()),
        ("cancel_url".into(), checkout.cancel_url.clone()),
    ];

    for (index, item) in order.items.iter().enumerate() {
        let cents = money::to_minor_units(item.unit_price)
            .filter(|cents| *cents >= 0)
            .ok_or_else(|| StripeError::InvalidAmount {
                name: item.name.clone(),
            })?;

        let prefix = format!("line_items[{index}]");
        form.push((
            format!("{prefix}[price_data][currency]"),
            checkout.currency.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        if let Some(description) = &item.description {
            form.push((
                format!("{prefix}[price_data][product_data][description]"),
                description.clone(),
            ));
        }
        form.push((format!("{prefix}[price_data][unit_amount]"), cents.to_string()));
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }

    // Tax as its own line keeps the hosted page's total equal to ours.
    if checkout.itemize_tax_line && order.pricing.tax > rust_decimal::Decimal::ZERO {
        let cents = money::to_minor_units(order.pricing.tax)
            .filter(|cents| *cents >= 0)
            .ok_or_else(|| StripeError::InvalidAmount {
                name: "Sales Tax".to_string(),
            })?;
        let prefix = format!("line_items[{}]", order.items.len());
        form.push((
            format!("{prefix}[price_data][currency]"),
            checkout.currency.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            "Sales Tax".to_string(),
        ));
        form.push((format!("{prefix}[price_data][unit_amount]"), cents.to_string()));
        form.push((format!("{prefix}[quantity]"), "1".to_string()));
    }

    let mut metadata: Vec<_> = order.to_session_metadata().into_iter().collect();
    metadata.sort();
    for (key, value) in metadata {
        form.push((format!("metadata[{key}]"), value));
    }

    Ok(form)
}
