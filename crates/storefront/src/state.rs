//! Handler state: the configuration plus every service client built from it.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::diagnostics::WebhookLog;
use crate::notify::Notifier;
use crate::services::email::{EmailError, EmailService};
use crate::store::{MemoryOrderRepository, OrderRepository, WebhookDedup};
use crate::stripe::StripeClient;
use crate::telegram::TelegramClient;

/// Handle to everything a request handler needs.
///
/// The payment client, notifier, and order stores sit behind one `Arc`,
/// so handing a copy to each handler is a pointer bump.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stripe: StripeClient,
    notifier: Notifier,
    email: Option<Arc<EmailService>>,
    orders: Arc<dyn OrderRepository>,
    dedup: WebhookDedup,
    webhook_log: WebhookLog,
}

impl AppState {
    /// Create application state with real delivery services built from
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay configuration is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, EmailError> {
        let email = config
            .email()
            .map(EmailService::new)
            .transpose()?
            .map(Arc::new);
        let telegram = config.telegram().map(TelegramClient::new);
        let notifier = Notifier::new(email.clone(), telegram, config.pricing);

        Ok(Self::assemble(config, notifier, email))
    }

    /// Create application state around an existing notifier. Used by
    /// router tests to inject counting channels.
    #[must_use]
    pub fn with_notifier(config: StorefrontConfig, notifier: Notifier) -> Self {
        Self::assemble(config, notifier, None)
    }

    fn assemble(
        config: StorefrontConfig,
        notifier: Notifier,
        email: Option<Arc<EmailService>>,
    ) -> Self {
        let stripe = StripeClient::new(&config.stripe, config.checkout.clone());

        Self {
            inner: Arc::new(AppStateInner {
                stripe,
                notifier,
                email,
                orders: Arc::new(MemoryOrderRepository::new()),
                dedup: WebhookDedup::new(),
                webhook_log: WebhookLog::new(),
                config,
            }),
        }
    }

    /// The storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Client for the hosted-checkout payment processor.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    /// Dispatcher for order and contact notifications.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// The SMTP service, if one is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_deref()
    }

    /// Orders stashed at checkout initiation, keyed by processor session id.
    #[must_use]
    pub fn orders(&self) -> &Arc<dyn OrderRepository> {
        &self.inner.orders
    }

    /// Set of webhook event ids already processed.
    #[must_use]
    pub fn dedup(&self) -> &WebhookDedup {
        &self.inner.dedup
    }

    /// Ring buffer of recent webhook outcomes, surfaced by diagnostics.
    #[must_use]
    pub fn webhook_log(&self) -> &WebhookLog {
        &self.inner.webhook_log
    }
}
