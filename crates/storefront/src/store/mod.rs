//! In-process stores for pending orders and webhook deduplication.
//!
//! Both are TTL caches, not durable storage. A pending card order also
//! lives in the processor session's metadata, which is the copy that
//! survives restarts; these stores only make the common path fast and
//! the webhook idempotent.

mod dedup;
mod orders;

pub use dedup::WebhookDedup;
pub use orders::{MemoryOrderRepository, OrderRepository};
