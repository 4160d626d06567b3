//! Line items: one product entry in a cart or order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::customer::ValidationError;

/// One product entry in a cart or order, with quantity and unit price.
///
/// Identity is the `id` field; a cart never holds two entries with the
/// same id. Wire format is camelCase to match the storefront clients
/// (`unitPrice`), with `price` accepted as an alias since older clients
/// and session metadata use the short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product identifier (menu item id).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional menu description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price per unit in standard currency units (dollars).
    #[serde(alias = "price")]
    pub unit_price: Decimal,
    /// Number of units. Always >= 1 inside a cart.
    pub quantity: u32,
    /// Optional menu category (e.g., "mains", "sides").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LineItem {
    /// Extended price for this line: `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Validate the structural invariants for an incoming line item.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the offending field when the id
    /// or name is empty, the unit price is negative, or the quantity is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("items[].id"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("items[].name"));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(ValidationError::InvalidField {
                field: "items[].unitPrice",
                reason: "must not be negative".to_owned(),
            });
        }
        if self.quantity == 0 {
            return Err(ValidationError::InvalidField {
                field: "items[].quantity",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, price: &str, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_owned(),
            name: format!("Item {id}"),
            description: None,
            unit_price: price.parse().unwrap(),
            quantity,
            category: None,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item("A", "10.00", 2).line_total(), "20.00".parse().unwrap());
        assert_eq!(item("B", "12.99", 1).line_total(), "12.99".parse().unwrap());
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(item("A", "9.50", 3)).unwrap();
        assert_eq!(json["unitPrice"], serde_json::json!("9.50"));
        assert_eq!(json["quantity"], serde_json::json!(3));
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_deserialize_accepts_price_alias() {
        let parsed: LineItem =
            serde_json::from_str(r#"{"id":"caesar","name":"Caesar","price":12.99,"quantity":1}"#)
                .unwrap();
        assert_eq!(parsed.unit_price, "12.99".parse().unwrap());
    }

    #[test]
    fn test_deserialize_accepts_numeric_unit_price() {
        let parsed: LineItem = serde_json::from_str(
            r#"{"id":"a","name":"A","unitPrice":10.5,"quantity":2,"category":"mains"}"#,
        )
        .unwrap();
        assert_eq!(parsed.unit_price, "10.5".parse().unwrap());
        assert_eq!(parsed.category.as_deref(), Some("mains"));
    }

    #[test]
    fn test_validate_happy_path() {
        assert!(item("A", "10.00", 1).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let err = item("A", "10.00", 0).validate().unwrap_err();
        assert!(err.to_string().contains("items[].quantity"));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let err = item("A", "-1.00", 1).validate().unwrap_err();
        assert!(err.to_string().contains("items[].unitPrice"));
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let err = item("  ", "1.00", 1).validate().unwrap_err();
        assert!(err.to_string().contains("items[].id"));
    }
}
