//! Core types for Fresca.
//!
//! This module provides the domain types shared by the order lifecycle.

pub mod customer;
pub mod email;
pub mod line_item;
pub mod money;
pub mod order;

pub use customer::{CustomerInfo, ValidationError, validate_order};
pub use email::{Email, EmailError};
pub use line_item::LineItem;
pub use order::{Order, OrderMetadataError, PaymentMethod};
