//! Session middleware configuration.
//!
//! Sessions are in-memory via tower-sessions. The only session state is
//! the cart snapshot, which is small and safe to lose on restart.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fresca_session";

/// Idle sessions expire after a week; every request resets the clock.
const SESSION_IDLE_TTL: Duration = Duration::days(7);

/// Session layer over an in-memory store. The cookie is `HttpOnly` and
/// `SameSite=Lax`; `Secure` is on whenever the public URL is https.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.base_url.starts_with("https://"))
        .with_expiry(Expiry::OnInactivity(SESSION_IDLE_TTL))
}
