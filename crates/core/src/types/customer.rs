//! Customer contact information collected at checkout.

use serde::{Deserialize, Serialize};

use crate::types::email::Email;
use crate::types::line_item::LineItem;
use crate::types::order::PaymentMethod;

/// Boundary validation failures.
///
/// Every variant names the offending field so the HTTP layer can surface
/// a message the client can act on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// A field is present but structurally invalid.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// Wire name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
    /// The order contains no line items.
    #[error("order must contain at least one item")]
    NoItems,
}

/// Customer contact details attached to an order.
///
/// Which fields are required depends on the payment method: the card path
/// needs an email (the payment processor and the confirmation email both
/// require one), the cash path does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Full name.
    pub name: String,
    /// Email address; required for card payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Delivery or pickup address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Special instructions ("no onions", delivery notes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl CustomerInfo {
    /// Validate the fields required for the given payment method.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the field when the name is
    /// blank, a card order lacks an email, or a provided email does not
    /// parse.
    pub fn validate(&self, method: PaymentMethod) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("customerInfo.name"));
        }

        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                Email::parse(email).map_err(|e| ValidationError::InvalidField {
                    field: "customerInfo.email",
                    reason: e.to_string(),
                })?;
            }
            _ if method == PaymentMethod::Card => {
                return Err(ValidationError::MissingField("customerInfo.email"));
            }
            _ => {}
        }

        Ok(())
    }

    /// The trimmed email address, if one was provided.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Validate a full order submission: non-empty item list, every item
/// structurally sound, customer fields sufficient for the payment method.
/// The first violation wins; nothing downstream runs on a bad payload.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_order(
    items: &[LineItem],
    customer: &CustomerInfo,
    method: PaymentMethod,
) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::NoItems);
    }
    for item in items {
        item.validate()?;
    }
    customer.validate(method)
}
