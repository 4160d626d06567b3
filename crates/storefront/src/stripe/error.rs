//! Payment processor errors.

use thiserror::Error;

/// Errors that can occur when interacting with the payment processor.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("Stripe request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Stripe response error: {0}")]
    Response(String),

    /// The API rejected the request.
    #[error("Stripe API error: {message}")]
    Api {
        /// HTTP status the API responded with.
        status: u16,
        /// The API's own error message, surfaced to the caller.
        message: String,
    },

    /// A line item amount does not fit in integer minor units.
    #[error("line item amount out of range for {name}")]
    InvalidAmount {
        /// Display name of the offending item.
        name: String,
    },
}

/// Webhook signature verification failures.
///
/// Any of these is a hard 400: the event body must not be parsed, and no
/// side effect may run, without a verified signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// No `Stripe-Signature` header on the request.
    #[error("missing Stripe-Signature header")]
    MissingHeader,

    /// Header present but not in `t=...,v1=...` form.
    #[error("malformed signature header: {0}")]
    Malformed(String),

    /// Timestamp outside the replay-protection tolerance.
    #[error("signature timestamp outside tolerance")]
    StaleTimestamp,

    /// No candidate signature matched the computed one.
    #[error("signature mismatch")]
    Mismatch,
}
