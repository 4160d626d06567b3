//! Request-level error type and its HTTP mapping.
//!
//! Every fallible handler returns [`AppError`]; converting one into a
//! response picks the status code, shapes the `{"error": ...}` body, and
//! reports server-side failures to Sentry on the way out.
//!
//! Best-effort notification sends are deliberately NOT represented here:
//! a failed notification is logged where it happens and never fails the
//! request that triggered it. Only the contact endpoint, whose entire job
//! is the email, propagates email failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::email::EmailError;
use crate::stripe::{SignatureError, StripeError};
use fresca_core::ValidationError;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed boundary validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Webhook signature was missing, malformed, or failed verification.
    #[error("Webhook error: {0}")]
    Signature(#[from] SignatureError),

    /// Payment processor call failed.
    #[error("Payment processor error: {0}")]
    Stripe(#[from] StripeError),

    /// Email send failed (contact endpoint only).
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Email is required by this endpoint but no relay is configured.
    #[error("Email is not configured")]
    EmailNotConfigured,

    /// Malformed input that serde and validation did not already catch.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Broken invariants and other bugs.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Upstream and internal failures get reported; client mistakes do not.
    fn is_server_fault(&self) -> bool {
        matches!(self, Self::Stripe(_) | Self::Email(_) | Self::Internal(_))
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Signature(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Stripe(StripeError::InvalidAmount { .. }) => StatusCode::BAD_REQUEST,
            Self::Stripe(_) | Self::Email(_) => StatusCode::BAD_GATEWAY,
            Self::EmailNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client sees. Validation and signature problems pass through
    /// so the caller can act on them, processor messages surface for failed
    /// checkouts, everything internal stays hidden.
    fn public_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Signature(err) => format!("Webhook error: {err}"),
            Self::Stripe(err) => err.to_string(),
            Self::Email(_) => "Failed to send email".to_string(),
            Self::EmailNotConfigured => "Email is not configured".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, %event_id, "Request failed");
        }

        let body = Json(serde_json::json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}

/// Shorthand for handler results.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a Sentry breadcrumb for a request milestone, so error reports
/// carry the trail of events leading up to the failure.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let data = data
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}
