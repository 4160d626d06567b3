//! Integration tests for Fresca.
//!
//! The tests in `tests/` drive the full storefront router through
//! `tower::ServiceExt::oneshot` — real routing, session layer, extractors,
//! and error mapping — with notification channels replaced by in-memory
//! counters. No network, no processor account, no SMTP relay.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fresca-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Session cart lifecycle over HTTP
//! - `storefront_orders` - Cash orders and checkout validation
//! - `storefront_webhook` - Signature verification, dedup, dispatch
//! - `storefront_contact` - Contact form validation and relay gating
//! - `storefront_health` - Health report and webhook diagnostics
//!
//! The one path not covered here is a live checkout-session creation,
//! which requires a processor API key; the form encoding it depends on
//! is unit-tested in `fresca-storefront`.
