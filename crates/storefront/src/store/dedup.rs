//! Webhook delivery deduplication.
//!
//! The processor redelivers webhooks until acknowledged, and can deliver
//! the same event more than once even after a 200. Notifications must go
//! out at most once per checkout session, so session ids are remembered
//! here and checked-and-set atomically before dispatch.

use std::time::Duration;

use moka::future::Cache;

/// How long handled session ids are remembered. Processor retry schedules
/// end well inside this window.
const DEDUP_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on remembered session ids.
const MAX_TRACKED_SESSIONS: u64 = 100_000;

/// Remembers which checkout sessions have already had notifications
/// dispatched.
#[derive(Clone)]
pub struct WebhookDedup {
    seen: Cache<String, ()>,
}

impl WebhookDedup {
    /// Create an empty dedup set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: Cache::builder()
                .max_capacity(MAX_TRACKED_SESSIONS)
                .time_to_live(DEDUP_TTL)
                .build(),
        }
    }

    /// Atomically mark a session id as handled.
    ///
    /// Returns `true` exactly once per session id within the TTL window;
    /// callers dispatch notifications only on `true`.
    pub async fn first_delivery(&self, session_id: &str) -> bool {
        self.seen
            .entry(session_id.to_string())
            .or_insert(())
            .await
            .is_fresh()
    }
}

impl Default for WebhookDedup {
    fn default() -> Self {
        Self::new()
    }
}
