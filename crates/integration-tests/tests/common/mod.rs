//! Shared helpers for storefront integration tests.
//!
//! Builds the real router with counting notification channels in place of
//! SMTP and the chat bot, plus request plumbing for driving it through
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)] // Not every test binary uses every helper.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use serde_json::Value;
use sha2::Sha256;
use tower::ServiceExt;

use fresca_core::{Order, PricingConfig};
use fresca_storefront::config::{CheckoutConfig, StorefrontConfig, StripeConfig};
use fresca_storefront::notify::{ChannelError, ChatChannel, EmailChannel, Notifier};
use fresca_storefront::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Webhook signing secret shared by every test config.
pub const WEBHOOK_SECRET: &str = "whsec_aB3xY9mK2nL5pQ7rT0uW4zC6";

/// A config equivalent to a fully set test environment, with chat and
/// email left unconfigured (tests inject channels through the notifier).
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid address"),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        stripe: StripeConfig {
            secret_key: SecretString::from("sk_test_aB3xY9mK2nL5pQ7rT0uW4zC6"),
            webhook_secret: SecretString::from(WEBHOOK_SECRET),
        },
        checkout: CheckoutConfig {
            currency: "usd".to_string(),
            itemize_tax_line: true,
            success_url: "http://localhost:3000/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "http://localhost:3000/cart".to_string(),
        },
        pricing: PricingConfig::default(),
        telegram: None,
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}

// =============================================================================
// Counting Channels
// =============================================================================

/// Email channel that counts sends instead of speaking SMTP.
#[derive(Default)]
pub struct CountingEmail {
    pub confirmations: AtomicUsize,
    pub notifications: AtomicUsize,
}

impl CountingEmail {
    pub fn total_sends(&self) -> usize {
        self.confirmations.load(Ordering::SeqCst) + self.notifications.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailChannel for CountingEmail {
    async fn customer_confirmation(&self, _order: &Order, _to: &str) -> Result<(), ChannelError> {
        self.confirmations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn business_notification(&self, _order: &Order) -> Result<(), ChannelError> {
        self.notifications.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Chat channel that counts sends; `failing` makes every send error.
#[derive(Default)]
pub struct CountingChat {
    pub cash: AtomicUsize,
    pub paid: AtomicUsize,
    pub failing: bool,
}

impl CountingChat {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ChatChannel for CountingChat {
    async fn cash_order(
        &self,
        _order: &Order,
        _pricing: &PricingConfig,
    ) -> Result<(), ChannelError> {
        self.cash.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ChannelError::new("chat unreachable"));
        }
        Ok(())
    }

    async fn paid_order(&self, _order: &Order) -> Result<(), ChannelError> {
        self.paid.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ChannelError::new("chat unreachable"));
        }
        Ok(())
    }
}

// =============================================================================
// App Assembly
// =============================================================================

/// The router under test plus handles to its state and channels.
///
/// The channel handles are always present; a handle whose channel was
/// never attached simply never counts.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub email: Arc<CountingEmail>,
    pub chat: Arc<CountingChat>,
}

/// Build the full application with both counting channels attached.
pub fn test_app() -> TestApp {
    assemble(
        Some(Arc::new(CountingEmail::default())),
        Some(Arc::new(CountingChat::default())),
    )
}

/// Build the application with a counting email channel and a chat
/// channel whose every send fails.
pub fn failing_chat_app() -> TestApp {
    assemble(
        Some(Arc::new(CountingEmail::default())),
        Some(Arc::new(CountingChat::failing())),
    )
}

/// Build the application with no notification channels at all.
pub fn bare_app() -> TestApp {
    assemble(None, None)
}

fn assemble(email: Option<Arc<CountingEmail>>, chat: Option<Arc<CountingChat>>) -> TestApp {
    let config = test_config();
    let notifier = Notifier::with_channels(
        email
            .as_ref()
            .map(|e| Arc::clone(e) as Arc<dyn EmailChannel>),
        chat.as_ref().map(|c| Arc::clone(c) as Arc<dyn ChatChannel>),
        config.pricing,
    );
    let state = AppState::with_notifier(config, notifier);

    TestApp {
        app: fresca_storefront::app(state.clone()),
        state,
        email: email.unwrap_or_default(),
        chat: chat.unwrap_or_default(),
    }
}

// =============================================================================
// Request Plumbing
// =============================================================================

/// POST a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> Response<Body> {
    request(app, "POST", uri, Some(body), &[]).await
}

/// POST a JSON body with extra headers (e.g. a session cookie).
pub async fn post_json_with(
    app: &Router,
    uri: &str,
    body: &Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    request(app, "POST", uri, Some(body), headers).await
}

/// GET a path.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    request(app, "GET", uri, None, &[]).await
}

/// GET a path with extra headers.
pub async fn get_with(app: &Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    request(app, "GET", uri, None, headers).await
}

/// Send one request through a clone of the router.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&Value>,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .expect("request builds");

    app.clone().oneshot(request).await.expect("request handled")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// The session cookie pair from a `Set-Cookie` header, ready to send back.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|raw| raw.split(';').next().unwrap_or(raw).to_string())
}

// =============================================================================
// Webhook Signing
// =============================================================================

/// Sign a payload the way the processor does: HMAC-SHA256 over
/// `"{t}.{body}"`, presented as `t=<ts>,v1=<hex>`.
pub fn signature_header(body: &[u8], secret: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

/// POST a webhook payload with a signature header.
pub async fn post_webhook(app: &Router, payload: &Value, signature: &str) -> Response<Body> {
    request(
        app,
        "POST",
        "/webhook",
        Some(payload),
        &[("stripe-signature", signature)],
    )
    .await
}

/// POST a webhook payload signed with the test secret.
pub async fn post_signed_webhook(app: &Router, payload: &Value) -> Response<Body> {
    let signature = signature_header(payload.to_string().as_bytes(), WEBHOOK_SECRET);
    post_webhook(app, payload, &signature).await
}
