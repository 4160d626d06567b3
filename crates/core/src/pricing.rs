//! Order totals: subtotal, cash discount, tax.
//!
//! Pure arithmetic over [`Decimal`] values. Rates are deployment
//! configuration, not constants; different locations run different tax
//! rates, so nothing here hardcodes one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::line_item::LineItem;
use crate::types::money::round2;
use crate::types::order::PaymentMethod;

/// Deployment-configured rates used by [`compute_totals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Sales tax rate applied to the discounted subtotal (e.g., `0.08`).
    pub tax_rate: Decimal,
    /// Discount rate applied to cash orders (e.g., `0.05`).
    pub cash_discount_rate: Decimal,
}

impl Default for PricingConfig {
    /// The most common deployment: 8% tax, 5% cash discount.
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            cash_discount_rate: Decimal::new(5, 2),
        }
    }
}

/// Computed order totals. Derived, never persisted independently.
///
/// Invariant: `total = subtotal - discount + tax`, with `tax` computed on
/// the discounted subtotal. All fields are rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// Sum of line totals before any adjustment.
    pub subtotal: Decimal,
    /// Cash discount (zero for card payments).
    pub discount: Decimal,
    /// Sales tax on `subtotal - discount`.
    pub tax: Decimal,
    /// Amount the customer pays.
    pub total: Decimal,
}

impl PricingBreakdown {
    /// An all-zero breakdown (empty order).
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Compute the full breakdown for a list of items and a payment method.
///
/// Defined for the empty list (all fields zero). Deterministic and free of
/// I/O; this is the single source of truth for order arithmetic, and the
/// HTTP layer recomputes it server-side rather than trusting client totals.
#[must_use]
pub fn compute_totals(
    items: &[LineItem],
    method: PaymentMethod,
    config: &PricingConfig,
) -> PricingBreakdown {
    let subtotal = round2(items.iter().map(LineItem::line_total).sum());

    let discount = match method {
        PaymentMethod::Cash => round2(subtotal * config.cash_discount_rate),
        PaymentMethod::Card => Decimal::ZERO,
    };

    let taxable = subtotal - discount;
    let tax = round2(taxable * config.tax_rate);

    PricingBreakdown {
        subtotal,
        discount,
        tax,
        total: taxable + tax,
    }
}
