//! Best-effort notification dispatch.
//!
//! Once an order is paid (or a cash order is accepted), the customer and
//! the operator are notified over whatever channels are configured. Every
//! send is awaited and caught independently: one channel failing never
//! blocks another, and no failure here ever propagates to the caller —
//! the order is already accepted, losing it over a notification would be
//! worse than losing the notification.
//!
//! Channels sit behind trait objects so tests can count sends without a
//! network.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use fresca_core::{Order, PricingConfig};

use crate::services::email::EmailService;
use crate::telegram::{TelegramClient, build_cash_order_message, build_paid_order_message};

/// Opaque failure from a notification channel; the dispatcher only logs it.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ChannelError(String);

impl ChannelError {
    /// Wrap any displayable send failure.
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self(err.to_string())
    }
}

/// Email deliveries the dispatcher can request.
#[async_trait]
pub trait EmailChannel: Send + Sync {
    /// Send the order confirmation to the customer.
    async fn customer_confirmation(&self, order: &Order, to: &str) -> Result<(), ChannelError>;

    /// Send the new-order notification to the operator inbox.
    async fn business_notification(&self, order: &Order) -> Result<(), ChannelError>;
}

/// Chat deliveries the dispatcher can request.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Post the cash-order notification to the operator chat.
    async fn cash_order(&self, order: &Order, pricing: &PricingConfig) -> Result<(), ChannelError>;

    /// Post the payment-received notification to the operator chat.
    async fn paid_order(&self, order: &Order) -> Result<(), ChannelError>;
}

#[async_trait]
impl EmailChannel for EmailService {
    async fn customer_confirmation(&self, order: &Order, to: &str) -> Result<(), ChannelError> {
        self.send_order_confirmation(order, to)
            .await
            .map_err(ChannelError::new)
    }

    async fn business_notification(&self, order: &Order) -> Result<(), ChannelError> {
        self.send_order_notification(order)
            .await
            .map_err(ChannelError::new)
    }
}

#[async_trait]
impl ChatChannel for TelegramClient {
    async fn cash_order(&self, order: &Order, pricing: &PricingConfig) -> Result<(), ChannelError> {
        self.send_message(&build_cash_order_message(order, pricing))
            .await
            .map_err(ChannelError::new)
    }

    async fn paid_order(&self, order: &Order) -> Result<(), ChannelError> {
        self.send_message(&build_paid_order_message(order))
            .await
            .map_err(ChannelError::new)
    }
}

/// Per-dispatch record of which channels sent, failed, or were skipped.
///
/// Channel names: `customer-email`, `business-email`, `telegram`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Channels that delivered.
    pub sent: Vec<&'static str>,
    /// Channels that were attempted and failed.
    pub failed: Vec<&'static str>,
    /// Channels not attempted (unconfigured, or no recipient).
    pub skipped: Vec<&'static str>,
}

impl DispatchSummary {
    /// One-line description for logs and the diagnostics buffer.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.sent.is_empty() {
            parts.push(format!("sent: {}", self.sent.join(", ")));
        }
        if !self.failed.is_empty() {
            parts.push(format!("failed: {}", self.failed.join(", ")));
        }
        if !self.skipped.is_empty() {
            parts.push(format!("skipped: {}", self.skipped.join(", ")));
        }
        if parts.is_empty() {
            "no channels".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Outcome of the single cash-order chat notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashNotifyOutcome {
    /// The operator chat message was delivered.
    Sent,
    /// The send was attempted and failed.
    Failed,
    /// No chat credentials are configured.
    NotConfigured,
}

/// Dispatches order notifications over the configured channels.
pub struct Notifier {
    email: Option<Arc<dyn EmailChannel>>,
    chat: Option<Arc<dyn ChatChannel>>,
    pricing: PricingConfig,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("email_configured", &self.email.is_some())
            .field("chat_configured", &self.chat.is_some())
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Build a notifier over the real delivery services. Either may be
    /// absent; the dispatcher skips what is not configured.
    #[must_use]
    pub fn new(
        email: Option<Arc<EmailService>>,
        telegram: Option<TelegramClient>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            email: email.map(|service| service as Arc<dyn EmailChannel>),
            chat: telegram.map(|client| Arc::new(client) as Arc<dyn ChatChannel>),
            pricing,
        }
    }

    /// Build a notifier from already-boxed channels.
    #[must_use]
    pub fn with_channels(
        email: Option<Arc<dyn EmailChannel>>,
        chat: Option<Arc<dyn ChatChannel>>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            email,
            chat,
            pricing,
        }
    }

    /// Notify everyone about a completed card payment: customer
    /// confirmation email, operator email, operator chat message.
    ///
    /// Never fails. Failures are logged per channel and reported in the
    /// returned summary.
    pub async fn notify_paid_order(&self, order: &Order) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        match (&self.email, order.customer.email()) {
            (Some(email), Some(to)) => match email.customer_confirmation(order, to).await {
                Ok(()) => summary.sent.push("customer-email"),
                Err(err) => {
                    warn!(
                        error = %err,
                        order_id = %order.order_id,
                        "Customer confirmation email failed"
                    );
                    summary.failed.push("customer-email");
                }
            },
            (Some(_), None) => {
                warn!(
                    order_id = %order.order_id,
                    "Order has no customer email, skipping confirmation"
                );
                summary.skipped.push("customer-email");
            }
            (None, _) => summary.skipped.push("customer-email"),
        }

        if let Some(email) = &self.email {
            match email.business_notification(order).await {
                Ok(()) => summary.sent.push("business-email"),
                Err(err) => {
                    warn!(
                        error = %err,
                        order_id = %order.order_id,
                        "Business notification email failed"
                    );
                    summary.failed.push("business-email");
                }
            }
        } else {
            summary.skipped.push("business-email");
        }

        if let Some(chat) = &self.chat {
            match chat.paid_order(order).await {
                Ok(()) => summary.sent.push("telegram"),
                Err(err) => {
                    warn!(
                        error = %err,
                        order_id = %order.order_id,
                        "Telegram paid-order notification failed"
                    );
                    summary.failed.push("telegram");
                }
            }
        } else {
            summary.skipped.push("telegram");
        }

        info!(
            order_id = %order.order_id,
            outcome = %summary.describe(),
            "Paid-order notifications dispatched"
        );

        summary
    }

    /// Send the single operator chat notification for a cash order.
    ///
    /// Never fails; a missing configuration or failed send is reported in
    /// the outcome so the route can phrase its (still successful) response.
    pub async fn notify_cash_order(&self, order: &Order) -> CashNotifyOutcome {
        let Some(chat) = &self.chat else {
            warn!(
                order_id = %order.order_id,
                "Telegram not configured, cash order accepted without notification"
            );
            return CashNotifyOutcome::NotConfigured;
        };

        match chat.cash_order(order, &self.pricing).await {
            Ok(()) => {
                info!(order_id = %order.order_id, "Cash-order notification sent");
                CashNotifyOutcome::Sent
            }
            Err(err) => {
                warn!(
                    error = %err,
                    order_id = %order.order_id,
                    "Cash-order notification failed"
                );
                CashNotifyOutcome::Failed
            }
        }
    }
}
