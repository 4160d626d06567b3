//! Bounded in-memory webhook diagnostics.
//!
//! A small newest-first log of webhook processing outcomes, readable over
//! `GET /webhook-logs`. Deliberately in-memory and reset on restart: it
//! exists so an operator can see why a payment notification did or did
//! not go out, not as an audit trail.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum retained entries; older ones are dropped.
const CAPACITY: usize = 50;

/// One webhook-processing record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookLogEntry {
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// Event type, or a pseudo-type such as `signature.rejected`.
    pub event: String,
    /// Session or order id the entry refers to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// What happened.
    pub outcome: String,
}

/// Fixed-capacity, newest-first log of webhook outcomes.
#[derive(Debug, Default)]
pub struct WebhookLog {
    entries: Mutex<VecDeque<WebhookLogEntry>>,
}

impl WebhookLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest once at capacity.
    pub fn record(&self, event: &str, reference: Option<&str>, outcome: &str) {
        let entry = WebhookLogEntry {
            timestamp: Utc::now(),
            event: event.to_string(),
            reference: reference.map(str::to_string),
            outcome: outcome.to_string(),
        };

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if entries.len() == CAPACITY {
            entries.pop_back();
        }
        entries.push_front(entry);
    }

    /// Snapshot of all entries, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<WebhookLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}
