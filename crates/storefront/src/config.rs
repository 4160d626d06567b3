//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (success/cancel redirects)
//! - `STRIPE_SECRET_KEY` - Payment processor API secret key
//! - `STRIPE_WEBHOOK_SECRET` - Webhook signing secret for event verification
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `TAX_RATE` - Sales tax rate (default: 0.08)
//! - `CASH_DISCOUNT_RATE` - Cash order discount rate (default: 0.05)
//! - `CURRENCY` - ISO currency code for checkout sessions (default: usd)
//! - `ITEMIZE_TAX_LINE` - Send tax as its own checkout line item (default: true)
//! - `CHECKOUT_SUCCESS_URL` - Override for the post-payment redirect
//! - `CHECKOUT_CANCEL_URL` - Override for the cancelled-checkout redirect
//! - `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` - Chat notifications (set together)
//! - `SMTP_HOST` / `SMTP_PORT` / `SMTP_USERNAME` / `SMTP_PASSWORD` - Email relay
//! - `EMAIL_FROM_ADDRESS` - From address for transactional email
//! - `ORDER_NOTIFICATION_ADDRESS` - Operator inbox (default: from address)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 1.0)

use std::collections::HashMap;
use std::env;
use std::net::{IpAddr, SocketAddr};

use fresca_core::Email;
use fresca_core::pricing::PricingConfig;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Secrets below this per-character entropy look hand-typed, not generated.
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as a template leftover, checked
/// case-insensitively.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-", "changeme", "replace", "placeholder", "example", "secret", "password", "xxx",
    "todo", "fixme", "insert", "enter-", "put-your", "add-your",
];

/// Ways loading the environment can fail.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Refusing insecure value for {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Bind address for the listener
    pub host: IpAddr,
    /// Listener port
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Payment processor configuration
    pub stripe: StripeConfig,
    /// Checkout session behavior
    pub checkout: CheckoutConfig,
    /// Tax and cash discount rates
    pub pricing: PricingConfig,
    /// Chat notification configuration (disabled when absent)
    pub telegram: Option<TelegramConfig>,
    /// Transactional email configuration (disabled when absent)
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Payment processor credentials.
///
/// `Debug` is hand-written so neither secret can leak into logs.
#[derive(Clone)]
pub struct StripeConfig {
    /// API secret key (server-side only)
    pub secret_key: SecretString,
    /// Webhook signing secret shared with the processor
    pub webhook_secret: SecretString,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .finish()
    }
}

/// Checkout session behavior.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// ISO currency code sent with every line item
    pub currency: String,
    /// When true, tax is sent to the processor as its own line item so the
    /// hosted page's total matches the computed total; when false, tax only
    /// appears in the internal breakdown and session metadata.
    pub itemize_tax_line: bool,
    /// Redirect after successful payment
    pub success_url: String,
    /// Redirect after an abandoned checkout
    pub cancel_url: String,
}

/// Telegram chat notification configuration.
///
/// `Debug` is hand-written to keep the bot token out of logs.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: SecretString,
    /// Target chat for business notifications
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// SMTP relay configuration.
///
/// `Debug` is hand-written to keep the password out of logs.
#[derive(Clone)]
pub struct EmailConfig {
    /// Relay hostname
    pub host: String,
    /// Relay port (default 587 for STARTTLS)
    pub port: u16,
    /// Relay login
    pub username: String,
    /// Relay password
    pub password: SecretString,
    /// From address for outgoing mail
    pub from_address: String,
    /// Operator inbox for business order notifications
    pub notification_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("notification_address", &self.notification_address)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load the full configuration from the process environment.
    ///
    /// A `.env` file is folded in first when one exists.
    ///
    /// # Errors
    ///
    /// Fails when a required variable is absent, a value does not parse,
    /// or a secret trips the placeholder/entropy checks.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = env_or("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env_or("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = base_url_env("STOREFRONT_BASE_URL")?;

        let stripe = StripeConfig::from_env()?;
        let checkout = CheckoutConfig::from_env(&base_url)?;
        let pricing = pricing_from_env()?;
        let telegram = TelegramConfig::from_env()?;
        let email = EmailConfig::from_env()?;

        let sentry_dsn = optional_env("SENTRY_DSN");
        let sentry_environment = optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = sample_rate_env("SENTRY_SAMPLE_RATE");
        let sentry_traces_sample_rate = sample_rate_env("SENTRY_TRACES_SAMPLE_RATE");

        Ok(Self {
            host,
            port,
            base_url,
            stripe,
            checkout,
            pricing,
            telegram,
            email,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Host and port combined into the listener's bind address.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Telegram settings, or `None` when chat notifications are disabled.
    #[must_use]
    pub const fn telegram(&self) -> Option<&TelegramConfig> {
        self.telegram.as_ref()
    }

    /// SMTP settings, or `None` when email is disabled.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailConfig> {
        self.email.as_ref()
    }
}

impl StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: validated_secret("STRIPE_SECRET_KEY")?,
            webhook_secret: validated_secret("STRIPE_WEBHOOK_SECRET")?,
        })
    }
}

impl CheckoutConfig {
    fn from_env(base_url: &str) -> Result<Self, ConfigError> {
        let itemize_tax_line = env_or("ITEMIZE_TAX_LINE", "true")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ITEMIZE_TAX_LINE".to_string(), e.to_string())
            })?;

        // The processor substitutes {CHECKOUT_SESSION_ID} on redirect
        let success_url = env_or(
            "CHECKOUT_SUCCESS_URL",
            &format!("{base_url}/success?session_id={{CHECKOUT_SESSION_ID}}"),
        );
        let cancel_url = env_or("CHECKOUT_CANCEL_URL", &format!("{base_url}/cart"));

        Ok(Self {
            currency: env_or("CURRENCY", "usd").to_lowercase(),
            itemize_tax_line,
            success_url,
            cancel_url,
        })
    }
}

impl TelegramConfig {
    /// Load Telegram configuration from environment.
    ///
    /// Returns `None` when neither variable is set (chat notifications
    /// disabled). Setting only one of the pair is an error.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let bot_token = optional_env("TELEGRAM_BOT_TOKEN");
        let chat_id = optional_env("TELEGRAM_CHAT_ID");

        match (bot_token, chat_id) {
            (Some(token), Some(chat_id)) => {
                check_secret_strength(&token, "TELEGRAM_BOT_TOKEN")?;
                Ok(Some(Self {
                    bot_token: SecretString::from(token),
                    chat_id,
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "TELEGRAM_*".to_string(),
                "Both TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set together".to_string(),
            )),
        }
    }
}

impl EmailConfig {
    /// Load SMTP configuration from environment.
    ///
    /// Returns `None` when no SMTP variable is set (email disabled).
    /// A partially configured relay is an error rather than a silent
    /// misconfiguration.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let host = optional_env("SMTP_HOST");
        let username = optional_env("SMTP_USERNAME");
        let password = optional_env("SMTP_PASSWORD");

        if host.is_none() && username.is_none() && password.is_none() {
            return Ok(None);
        }

        let (Some(host), Some(username), Some(password)) = (host, username, password) else {
            return Err(ConfigError::InvalidEnvVar(
                "SMTP_*".to_string(),
                "SMTP_HOST, SMTP_USERNAME, and SMTP_PASSWORD must be set together".to_string(),
            ));
        };

        let port = env_or("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let from_address = require_env("EMAIL_FROM_ADDRESS")?;
        check_email_address("EMAIL_FROM_ADDRESS", &from_address)?;
        let notification_address = env_or("ORDER_NOTIFICATION_ADDRESS", &from_address);
        check_email_address("ORDER_NOTIFICATION_ADDRESS", &notification_address)?;

        Ok(Some(Self {
            host,
            port,
            username,
            password: SecretString::from(password),
            from_address,
            notification_address,
        }))
    }
}

/// Parse tax and cash discount rates from environment.
fn pricing_from_env() -> Result<PricingConfig, ConfigError> {
    let defaults = PricingConfig::default();
    Ok(PricingConfig {
        tax_rate: rate_env("TAX_RATE", defaults.tax_rate)?,
        cash_discount_rate: rate_env("CASH_DISCOUNT_RATE", defaults.cash_discount_rate)?,
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read a variable, erroring when it is absent.
fn require_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Read a variable that may legitimately be unset.
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Read a variable, falling back to a default when unset.
fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Sentry sample rates ride on a best-effort parse; an absent or
/// unparseable value means "sample everything".
fn sample_rate_env(key: &str) -> f32 {
    optional_env(key).and_then(|s| s.parse().ok()).unwrap_or(1.0)
}

/// Read a required URL variable, validated and stripped of trailing slashes.
fn base_url_env(key: &str) -> Result<String, ConfigError> {
    let raw = require_env(key)?;
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Read a decimal rate in `[0, 1)` from the environment, with a default.
fn rate_env(key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
    optional_env(key).map_or(Ok(default), |raw| parse_rate(key, &raw))
}

/// Check that an address variable holds a parseable email, so a typo in
/// the operator inbox fails at startup rather than at first send.
fn check_email_address(key: &str, raw: &str) -> Result<(), ConfigError> {
    Email::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(())
}

/// Parse and bounds-check a decimal rate in `[0, 1)`.
fn parse_rate(key: &str, raw: &str) -> Result<Decimal, ConfigError> {
    let rate = raw
        .parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("rate must be in [0, 1), got {rate}"),
        ));
    }
    Ok(rate)
}

/// Shannon entropy of a string, in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let char_count = s.chars().count();
    if char_count == 0 {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }

    #[allow(clippy::cast_precision_loss)] // secrets are far shorter than 2^52
    let total = char_count as f64;
    counts
        .values()
        .map(|&n| {
            #[allow(clippy::cast_precision_loss)]
            let p = n as f64 / total;
            -(p * p.log2())
        })
        .sum()
}

/// Refuse placeholder-looking or low-entropy secrets at startup, before a
/// template value can silently reach the payment processor.
fn check_secret_strength(secret: &str, key: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!("looks like a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "entropy {entropy:.2} bits/char is below the {MIN_ENTROPY_BITS_PER_CHAR:.1} minimum; use a randomly generated value"
            ),
        ));
    }

    Ok(())
}

/// Read a secret variable, refusing startup when it fails strength checks.
fn validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = require_env(key)?;
    check_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
