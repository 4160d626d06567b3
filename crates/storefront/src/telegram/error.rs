//! Failure modes of the Bot API client.

use thiserror::Error;

/// Why a `sendMessage` call came back empty-handed.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The HTTP call to the Bot API never completed.
    #[error("Telegram request failed: {0}")]
    Request(String),

    /// The Bot API answered with a body we could not decode.
    #[error("Telegram response unreadable: {0}")]
    Response(String),

    /// The Bot API answered `ok: false`.
    #[error("Telegram rejected the message: {0}")]
    Api(String),
}
