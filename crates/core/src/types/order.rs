//! Orders and their payment-processor metadata encoding.
//!
//! There is no order database. A card order survives between checkout and
//! the payment webhook in two places: the in-process order repository
//! (fast path) and the processor session's string-keyed metadata (durable
//! path, survives our restarts). This module owns both encodings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::PricingBreakdown;
use crate::types::customer::CustomerInfo;
use crate::types::line_item::LineItem;

/// Placeholder written into metadata for absent optional fields, matching
/// what the storefront clients historically sent.
const METADATA_NONE: &str = "N/A";

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Hosted processor checkout session.
    Card,
    /// Cash on delivery/pickup; no processor involved.
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Cash => write!(f, "cash"),
        }
    }
}

/// Errors reading an order back out of session metadata.
#[derive(thiserror::Error, Debug)]
pub enum OrderMetadataError {
    /// The `items` metadata value is not a valid JSON item list.
    #[error("metadata items are not valid JSON: {0}")]
    MalformedItems(#[source] serde_json::Error),
    /// An amount field holds something that is not a decimal.
    #[error("metadata amount {key} is not a decimal: {value:?}")]
    MalformedAmount {
        /// Metadata key the bad value was found under.
        key: &'static str,
        /// The raw value.
        value: String,
    },
}

/// A placed order: customer, items, computed totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Generated order reference (e.g., `ORD-1724380000000-9F3A2C1B`).
    pub order_id: String,
    /// Customer contact details.
    pub customer: CustomerInfo,
    /// Items on the order.
    pub items: Vec<LineItem>,
    /// Server-computed totals.
    pub pricing: PricingBreakdown,
    /// How the customer pays.
    pub payment_method: PaymentMethod,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// Compact item encoding used inside session metadata, where space is
/// limited and only the notification-relevant fields matter.
#[derive(Debug, Serialize, Deserialize)]
struct MetadataItem {
    name: String,
    #[serde(alias = "unitPrice")]
    price: Decimal,
    quantity: u32,
}

impl From<&LineItem> for MetadataItem {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

impl From<MetadataItem> for LineItem {
    fn from(item: MetadataItem) -> Self {
        // Metadata items carry no product id; the display name stands in.
        Self {
            id: item.name.clone(),
            name: item.name,
            description: None,
            unit_price: item.price,
            quantity: item.quantity,
            category: None,
        }
    }
}

impl Order {
    /// Build a new order with a freshly generated order id.
    #[must_use]
    pub fn new(
        customer: CustomerInfo,
        items: Vec<LineItem>,
        pricing: PricingBreakdown,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            order_id: generate_order_id(),
            customer,
            items,
            pricing,
            payment_method,
            created_at: Utc::now(),
        }
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// One-line order summary, e.g. `2x Margherita, 1x Caesar`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.items
            .iter()
            .map(|i| format!("{}x {}", i.quantity, i.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Encode the order as string key/value metadata for the processor
    /// session. This is the durable copy read back when the payment
    /// webhook fires, so the key set must stay stable.
    #[must_use]
    pub fn to_session_metadata(&self) -> HashMap<String, String> {
        let items_json = serde_json::to_string(
            &self.items.iter().map(MetadataItem::from).collect::<Vec<_>>(),
        )
        .unwrap_or_else(|_| "[]".to_owned());

        let mut metadata = HashMap::new();
        metadata.insert("orderId".to_owned(), self.order_id.clone());
        metadata.insert("customerName".to_owned(), self.customer.name.clone());
        metadata.insert(
            "customerPhone".to_owned(),
            self.customer
                .phone
                .clone()
                .unwrap_or_else(|| METADATA_NONE.to_owned()),
        );
        metadata.insert(
            "customerAddress".to_owned(),
            self.customer
                .address
                .clone()
                .unwrap_or_else(|| METADATA_NONE.to_owned()),
        );
        metadata.insert(
            "specialInstructions".to_owned(),
            self.customer
                .instructions
                .clone()
                .unwrap_or_else(|| "None".to_owned()),
        );
        metadata.insert("items".to_owned(), items_json);
        metadata.insert("orderSummary".to_owned(), self.summary());
        metadata.insert("subtotal".to_owned(), format!("{:.2}", self.pricing.subtotal));
        metadata.insert("tax".to_owned(), format!("{:.2}", self.pricing.tax));
        metadata.insert("total".to_owned(), format!("{:.2}", self.pricing.total));
        metadata.insert("itemCount".to_owned(), self.item_count().to_string());
        metadata
    }

    /// Reconstruct an order from session metadata.
    ///
    /// Tolerates absent keys (an empty item list, zero amounts, a
    /// placeholder name) because a notification with partial data beats no
    /// notification; only structurally bad values are errors. The email is
    /// taken from the session's own customer fields, which the processor
    /// fills in, not from metadata.
    ///
    /// # Errors
    ///
    /// Returns [`OrderMetadataError`] when the `items` value is not valid
    /// JSON or an amount value is not a decimal.
    pub fn from_session_metadata(
        metadata: &HashMap<String, String>,
        fallback_order_id: &str,
        email: Option<&str>,
    ) -> Result<Self, OrderMetadataError> {
        let items: Vec<LineItem> = match metadata.get("items") {
            Some(raw) => serde_json::from_str::<Vec<MetadataItem>>(raw)
                .map_err(OrderMetadataError::MalformedItems)?
                .into_iter()
                .map(LineItem::from)
                .collect(),
            None => Vec::new(),
        };

        let pricing = PricingBreakdown {
            subtotal: metadata_amount(metadata, "subtotal")?,
            discount: Decimal::ZERO,
            tax: metadata_amount(metadata, "tax")?,
            total: metadata_amount(metadata, "total")?,
        };

        let customer = CustomerInfo {
            name: metadata
                .get("customerName")
                .cloned()
                .unwrap_or_else(|| "Customer".to_owned()),
            email: email.map(str::to_owned),
            phone: metadata_optional(metadata, "customerPhone"),
            address: metadata_optional(metadata, "customerAddress"),
            instructions: metadata
                .get("specialInstructions")
                .filter(|v| *v != "None" && !v.is_empty())
                .cloned(),
        };

        Ok(Self {
            order_id: metadata
                .get("orderId")
                .cloned()
                .unwrap_or_else(|| fallback_order_id.to_owned()),
            customer,
            items,
            pricing,
            payment_method: PaymentMethod::Card,
            created_at: Utc::now(),
        })
    }

    /// Build the minimal fallback order for a bare charge event, where
    /// only billing details and the charged amount are known: one
    /// synthetic line at the full amount, no tax or discount split.
    #[must_use]
    pub fn from_charge(amount: Decimal, customer_name: Option<&str>, email: Option<&str>) -> Self {
        let item = LineItem {
            id: "charge".to_owned(),
            name: "Order".to_owned(),
            description: None,
            unit_price: amount,
            quantity: 1,
            category: None,
        };
        let pricing = PricingBreakdown {
            subtotal: amount,
            discount: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: amount,
        };
        let customer = CustomerInfo {
            name: customer_name.unwrap_or("Customer").to_owned(),
            email: email.map(str::to_owned),
            ..CustomerInfo::default()
        };
        Self::new(customer, vec![item], pricing, PaymentMethod::Card)
    }
}

/// Generate an order reference: millisecond timestamp plus a short random
/// suffix, readable enough for a kitchen ticket.
fn generate_order_id() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    format!("ORD-{}-{}", Utc::now().timestamp_millis(), suffix.to_uppercase())
}

fn metadata_amount(
    metadata: &HashMap<String, String>,
    key: &'static str,
) -> Result<Decimal, OrderMetadataError> {
    metadata.get(key).map_or(Ok(Decimal::ZERO), |raw| {
        raw.parse()
            .map_err(|_| OrderMetadataError::MalformedAmount {
                key,
                value: raw.clone(),
            })
    })
}

fn metadata_optional(metadata: &HashMap<String, String>, key: &str) -> Option<String> {
    metadata
        .get(key)
        .filter(|v| *v != METADATA_NONE && !v.is_empty())
        .cloned()
}
