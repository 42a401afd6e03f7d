//! Durable representation of the cart.

use shelf_cache::Cache;

use crate::cart::LineItem;

/// Storage key holding the serialized line items.
pub const CART_KEY: &str = "cart";

/// Reads and writes the line item list.
///
/// Storage failures never escape: reads fall back to an empty list and
/// writes report `false`, both after logging.
#[derive(Debug, Clone)]
pub struct CartStore {
    cache: Cache,
}

impl CartStore {
    /// Create a store over `cache`.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Restore the persisted items.
    ///
    /// Entries that fail to decode are skipped individually, so one corrupt
    /// line does not discard the rest of the cart.
    pub fn load(&self) -> Vec<LineItem> {
        let raw = match self.cache.get::<Vec<serde_json::Value>>(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to restore cart, starting empty");
                return Vec::new();
            }
        };

        raw.into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<LineItem>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "dropping unreadable cart line");
                    None
                }
            })
            .collect()
    }

    /// Persist `items`. Returns whether the write succeeded.
    pub fn save(&self, items: &[LineItem]) -> bool {
        match self.cache.set(CART_KEY, items) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, lines = items.len(), "failed to persist cart");
                false
            }
        }
    }
}
