//! Health and diagnostics route handlers.
//!
//! `/health` reports liveness plus which external credentials are
//! configured, with masked previews so an operator can tell a test key
//! from a live key without the secret ever being echoed. `/webhook-logs`
//! exposes the bounded in-memory webhook diagnostics buffer.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use crate::diagnostics::WebhookLogEntry;
use crate::state::AppState;

/// Liveness plus the configuration presence report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub config: ConfigReport,
}

/// Presence report covering every external credential the service uses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    pub stripe_secret_key: CredentialStatus,
    pub stripe_webhook_secret: CredentialStatus,
    pub telegram_bot_token: CredentialStatus,
    pub telegram_chat_id: CredentialStatus,
    pub smtp: CredentialStatus,
}

/// Whether one credential is configured, with a masked preview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl CredentialStatus {
    fn present(value: &str) -> Self {
        Self {
            configured: true,
            preview: Some(masked(value)),
        }
    }

    const fn missing() -> Self {
        Self {
            configured: false,
            preview: None,
        }
    }

    fn secret(value: &SecretString) -> Self {
        Self::present(value.expose_secret())
    }
}

/// First four characters plus an ellipsis. Enough to distinguish a test
/// key from a live key without echoing the credential.
fn masked(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}…")
}

/// Report liveness and configuration presence.
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.config();

    let (telegram_bot_token, telegram_chat_id) = match config.telegram() {
        Some(telegram) => (
            CredentialStatus::secret(&telegram.bot_token),
            CredentialStatus::present(&telegram.chat_id),
        ),
        None => (CredentialStatus::missing(), CredentialStatus::missing()),
    };
    let smtp = config.email().map_or_else(CredentialStatus::missing, |email| {
        CredentialStatus::present(&email.username)
    });

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        config: ConfigReport {
            stripe_secret_key: CredentialStatus::secret(&config.stripe.secret_key),
            stripe_webhook_secret: CredentialStatus::secret(&config.stripe.webhook_secret),
            telegram_bot_token,
            telegram_chat_id,
            smtp,
        },
    })
}

/// Webhook diagnostics buffer, newest first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookLogsResponse {
    pub total_logs: usize,
    pub logs: Vec<WebhookLogEntry>,
}

/// Return the recent webhook-processing entries.
#[instrument(skip(state))]
pub async fn webhook_logs(State(state): State<AppState>) -> Json<WebhookLogsResponse> {
    let logs = state.webhook_log().snapshot();
    Json(WebhookLogsResponse {
        total_logs: logs.len(),
        logs,
    })
}
