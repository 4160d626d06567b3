//! Ordered shopping cart.
//!
//! Insertion order is display order, so the cart is a `Vec` with id lookup
//! rather than a map; carts are small (a dinner order, not a warehouse).
//! Persistence is the storefront's concern: the HTTP layer snapshots the
//! whole cart into the client session after every mutation.

use serde::{Deserialize, Serialize};

use crate::types::line_item::LineItem;

/// An ordered list of line items, keyed by item id.
///
/// Invariants: no two entries share an id; every entry has quantity >= 1
/// (a quantity reaching zero removes the entry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Restore a cart from a persisted snapshot, dropping any entries that
    /// violate the quantity invariant.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity > 0 {
                cart.add(item);
            }
        }
        cart
    }

    /// Add an item. If the id is already present the existing entry's
    /// quantity grows by the incoming quantity (minimum 1); otherwise the
    /// item is appended, keeping display order.
    pub fn add(&mut self, item: LineItem) {
        let added = item.quantity.max(1);
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(added);
        } else {
            self.items.push(LineItem {
                quantity: added,
                ..item
            });
        }
    }

    /// Remove the entry with the given id. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    /// Overwrite an entry's quantity. Zero removes the entry, preserving
    /// the no-zero-quantity invariant. Unknown ids are a no-op.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
        } else if let Some(existing) = self.items.iter_mut().find(|i| i.id == id) {
            existing.quantity = quantity;
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// All items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, yielding its items.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across all entries.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
