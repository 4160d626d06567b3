//! Telegram Bot API client.
//!
//! Posts operator notifications to a fixed chat via `sendMessage`.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::TelegramConfig;

use super::error::TelegramError;

/// All Bot API methods hang off this host, with the token in the path.
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Minimal Bot API client; `sendMessage` is the only method it speaks.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    /// Forms part of the request URL, so it must never appear in logs.
    bot_token: SecretString,
    /// Target chat for notifications.
    chat_id: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    /// Build a client over the given bot credentials.
    #[must_use]
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: Client::new(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }

    /// Post a Markdown-formatted message to the configured chat.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport fails or the API answers
    /// `ok: false`.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let url = format!(
            "{TELEGRAM_API_BASE}/bot{}/sendMessage",
            self.bot_token.expose_secret()
        );
        let message = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let result: SendMessageResponse = self
            .client
            .post(url)
            .json(&message)
            .send()
            .await
            .map_err(|e| TelegramError::Request(e.to_string()))?
            .json()
            .await
            .map_err(|e| TelegramError::Response(e.to_string()))?;

        if !result.ok {
            let reason = result
                .description
                .unwrap_or_else(|| "no description given".to_string());
            error!(%reason, "Telegram rejected sendMessage");
            return Err(TelegramError::Api(reason));
        }

        debug!(chat_id = %self.chat_id, "Telegram message delivered");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> TelegramClient {
        TelegramClient::new(&TelegramConfig {
            bot_token: SecretString::from("123456:ABC-test-token"),
            chat_id: "-1000000000000".to_string(),
        })
    }

    #[test]
    fn test_debug_redacts_bot_token() {
        let debug = format!("{:?}", test_client());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("ABC-test-token"));
        assert!(debug.contains("-1000000000000"));
    }

    #[test]
    fn test_send_message_serializes_parse_mode() {
        let message = SendMessage {
            chat_id: "-100",
            text: "*hello*",
            parse_mode: "Markdown",
        };
        let json = serde_json::to_value(&message).unwrap_or_default();
        assert_eq!(json["parse_mode"], "Markdown");
        assert_eq!(json["chat_id"], "-100");
    }
}
