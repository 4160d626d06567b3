//! Operator notifications over the Telegram Bot API.
//!
//! When a cash order is accepted or a card payment completes, a Markdown
//! summary of the order is rendered by the message builders here and
//! posted to a fixed operator chat through [`TelegramClient`]. Delivery
//! is best-effort: a failed post is logged and never fails the order
//! that triggered it.

mod client;
mod error;
mod messages;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use messages::{build_cash_order_message, build_paid_order_message};
