//! Storefront settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default cap on distinct products in the cart.
pub const DEFAULT_MAX_LINE_ITEMS: usize = 50;

/// Default cap on a single line item's quantity.
pub const DEFAULT_MAX_QUANTITY_PER_ITEM: u32 = 99;

/// Default lifetime of a transient notification.
pub const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 3;

/// Tunables for the cart engine and notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontSettings {
    /// Maximum distinct products in the cart.
    #[serde(default = "default_max_line_items")]
    pub max_line_items: usize,

    /// Quantity at which a line item saturates.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: u32,

    /// Seconds before a notification auto-dismisses.
    #[serde(default = "default_ttl_secs")]
    pub notification_ttl_secs: u64,
}

fn default_max_line_items() -> usize {
    DEFAULT_MAX_LINE_ITEMS
}

fn default_max_quantity() -> u32 {
    DEFAULT_MAX_QUANTITY_PER_ITEM
}

fn default_ttl_secs() -> u64 {
    DEFAULT_NOTIFICATION_TTL_SECS
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            max_line_items: DEFAULT_MAX_LINE_ITEMS,
            max_quantity_per_item: DEFAULT_MAX_QUANTITY_PER_ITEM,
            notification_ttl_secs: DEFAULT_NOTIFICATION_TTL_SECS,
        }
    }
}

impl StorefrontSettings {
    /// Notification lifetime as a `Duration`.
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }
}
