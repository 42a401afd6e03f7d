//! Cart and line item types.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::money::Money;
use crate::settings::{DEFAULT_MAX_LINE_ITEMS, DEFAULT_MAX_QUANTITY_PER_ITEM};

/// Product data supplied by an "add to cart" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub id: ProductId,
    pub name: String,
    /// Canonical unit price in the base currency.
    pub price: Money,
    #[serde(default)]
    pub image: String,
}

impl ProductInput {
    /// Create product input, coercing `price` to a non-negative amount.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: Money::from_decimal(price),
            image: image.into(),
        }
    }
}

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Unit price in the base currency.
    pub price: Money,
    /// Always at least 1 while the item is in the cart.
    pub quantity: u32,
}

impl LineItem {
    fn from_product(product: ProductInput) -> Self {
        Self {
            id: product.id,
            name: product.name,
            image: product.image,
            price: product.price,
            quantity: 1,
        }
    }

    /// `price * quantity`.
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// Result of [`Cart::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New line appended with quantity 1.
    Appended,
    /// Existing line incremented to the given quantity.
    Incremented(u32),
    /// Existing line already at the per-item cap; nothing changed.
    AtQuantityLimit,
    /// New product refused because the cart holds the maximum distinct items.
    CartFull,
}

impl AddOutcome {
    /// Whether the cart changed.
    pub fn changed(self) -> bool {
        matches!(self, Self::Appended | Self::Incremented(_))
    }
}

/// Ordered line items keyed by product id.
///
/// Totals and counts are always derived from the items; nothing is cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    max_line_items: usize,
    max_quantity_per_item: u32,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Create an empty cart with default limits.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_LINE_ITEMS, DEFAULT_MAX_QUANTITY_PER_ITEM)
    }

    /// Create an empty cart with explicit limits.
    pub fn with_limits(max_line_items: usize, max_quantity_per_item: u32) -> Self {
        Self {
            items: Vec::new(),
            max_line_items: max_line_items.max(1),
            max_quantity_per_item: max_quantity_per_item.max(1),
        }
    }

    /// Replace the contents with restored items.
    ///
    /// Zero quantities are dropped, duplicate ids merge into the first
    /// occurrence, quantities are capped and lines past `max_line_items` are
    /// dropped, so every cart invariant holds afterwards regardless of what
    /// storage contained.
    pub fn restore(&mut self, items: Vec<LineItem>) {
        self.items.clear();
        let mut dropped = 0_usize;
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            let line_count = self.items.len();
            match self.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .saturating_add(item.quantity)
                        .min(self.max_quantity_per_item);
                }
                None if line_count >= self.max_line_items => dropped += 1,
                None => {
                    let quantity = item.quantity.min(self.max_quantity_per_item);
                    self.items.push(LineItem { quantity, ..item });
                }
            }
        }

        if dropped > 0 {
            tracing::warn!(
                dropped,
                max_line_items = self.max_line_items,
                "restored cart exceeded the line limit"
            );
        }
    }

    /// Add one unit of `product`.
    pub fn add_item(&mut self, product: ProductInput) -> AddOutcome {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == product.id) {
            if existing.quantity >= self.max_quantity_per_item {
                return AddOutcome::AtQuantityLimit;
            }
            existing.quantity += 1;
            return AddOutcome::Incremented(existing.quantity);
        }

        if self.items.len() >= self.max_line_items {
            return AddOutcome::CartFull;
        }

        self.items.push(LineItem::from_product(product));
        AddOutcome::Appended
    }

    /// Remove the line for `id`. Returns `false` when absent.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() < len_before
    }

    /// Add `delta` to the quantity of `id`.
    ///
    /// A result of zero or below removes the line. Returns whether the cart
    /// changed; an absent id is a no-op.
    pub fn update_quantity(&mut self, id: ProductId, delta: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };

        let next = i64::from(item.quantity).saturating_add(delta);
        if next <= 0 {
            return self.remove_item(id);
        }

        let next = u32::try_from(next)
            .unwrap_or(u32::MAX)
            .min(self.max_quantity_per_item);
        if next == item.quantity {
            return false;
        }
        item.quantity = next;
        true
    }

    /// Remove every line. Returns `false` when already empty.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// Sum of `price * quantity`, in the base currency.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities (not the number of distinct lines).
    pub fn count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by product id.
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Most distinct lines the cart accepts.
    pub fn max_line_items(&self) -> usize {
        self.max_line_items
    }

    /// Most units of one product the cart accepts.
    pub fn max_quantity_per_item(&self) -> u32 {
        self.max_quantity_per_item
    }
}
