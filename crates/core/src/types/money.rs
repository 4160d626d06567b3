//! Decimal money helpers.
//!
//! All monetary amounts in Fresca are [`Decimal`] values in the currency's
//! standard unit (dollars, not cents). Floats are never used for money.
//! The payment processor API wants integer minor units (cents), so the
//! conversions live here next to the rounding rules.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to two decimal places.
///
/// Midpoints round away from zero (1.005 becomes 1.01), matching how the
/// storefront historically displayed totals.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a standard-unit amount to integer minor units (cents).
///
/// Returns `None` if the amount does not fit in an `i64` after scaling,
/// which no menu price ever should.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Convert integer minor units (cents) back to a standard-unit amount.
#[must_use]
pub fn from_minor_units(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Format an amount for human-readable output (e.g., `$19.99`).
///
/// Used in notification messages and email bodies, never in wire payloads.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", round2(amount))
}
