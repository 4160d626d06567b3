//! Shared order-domain library for Fresca Kitchen.
//!
//! Everything here is pure: no I/O, no async, no HTTP. The storefront
//! service layers transport and side effects on top of these types, which
//! keeps the domain rules trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Line items, customer info, orders, money helpers
//! - [`pricing`] - Subtotal/discount/tax/total computation
//! - [`cart`] - Ordered cart with add/remove/set-quantity semantics

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pricing;
pub mod types;

pub use cart::Cart;
pub use pricing::{PricingBreakdown, PricingConfig, compute_totals};
pub use types::*;
