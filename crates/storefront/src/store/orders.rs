//! Pending-order repository keyed by checkout session id.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use fresca_core::Order;

/// How long a pending card order is retained while awaiting its payment
/// webhook. Checkout sessions expire upstream within this window, so
/// anything older can only arrive through the metadata fallback anyway.
const ORDER_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on concurrently pending orders.
const MAX_PENDING_ORDERS: u64 = 10_000;

/// Storage for orders awaiting payment completion.
///
/// Losing an entry is survivable — the webhook handler falls back to the
/// order encoded in the session metadata. The trait seam lets tests seed
/// and inspect state directly.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store an order under its checkout session id.
    async fn put(&self, session_id: &str, order: Order);

    /// Fetch the order for a session id, leaving it stored.
    async fn get(&self, session_id: &str) -> Option<Order>;

    /// Drop the order for a session id once it has been handled.
    async fn remove(&self, session_id: &str);
}

/// Default TTL-cache-backed repository.
pub struct MemoryOrderRepository {
    orders: Cache<String, Order>,
}

impl MemoryOrderRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: Cache::builder()
                .max_capacity(MAX_PENDING_ORDERS)
                .time_to_live(ORDER_TTL)
                .build(),
        }
    }
}

impl Default for MemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn put(&self, session_id: &str, order: Order) {
        self.orders.insert(session_id.to_string(), order).await;
    }

    async fn get(&self, session_id: &str) -> Option<Order> {
        self.orders.get(session_id).await
    }

    async fn remove(&self, session_id: &str) {
        self.orders.invalidate(session_id).await;
    }
}
