//! Cart mutations with persistence and user feedback.

use std::rc::Rc;
use std::time::Duration;

use shelf_cache::Cache;

use crate::cart::{AddOutcome, Cart, CartStore, LineItem, ProductInput};
use crate::ids::ProductId;
use crate::money::Money;
use crate::notify::{Notification, Notifier, Severity};
use crate::settings::StorefrontSettings;

/// Owns the cart.
///
/// Every mutation that changes the cart is persisted before it returns.
/// Mutations report whether anything changed; there is no error channel.
pub struct CartEngine {
    cart: Cart,
    store: CartStore,
    notifier: Rc<dyn Notifier>,
    notification_ttl: Duration,
}

impl CartEngine {
    /// Restore the cart from `cache`.
    pub fn load(cache: Cache, settings: &StorefrontSettings, notifier: Rc<dyn Notifier>) -> Self {
        let store = CartStore::new(cache);
        let mut cart = Cart::with_limits(settings.max_line_items, settings.max_quantity_per_item);
        cart.restore(store.load());
        tracing::debug!(lines = cart.line_count(), units = cart.count(), "cart restored");

        Self {
            cart,
            store,
            notifier,
            notification_ttl: settings.notification_ttl(),
        }
    }

    /// Add one unit of `product` and confirm it to the user.
    pub fn add_item(&mut self, product: ProductInput) -> bool {
        let name = product.name.clone();
        let id = product.id;
        let outcome = self.cart.add_item(product);

        match outcome {
            AddOutcome::Appended | AddOutcome::Incremented(_) => {
                self.persist();
                tracing::debug!(%id, ?outcome, "item added");
                self.notify(Severity::Success, format!("{} added to cart", name));
            }
            AddOutcome::AtQuantityLimit => {
                self.notify(
                    Severity::Info,
                    format!("{} is already at the maximum quantity", name),
                );
            }
            AddOutcome::CartFull => {
                tracing::debug!(%id, lines = self.cart.line_count(), "cart full");
                self.notify(Severity::Error, "Your cart is full");
            }
        }

        outcome.changed()
    }

    /// Remove the line for `id`. No-op when absent.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let changed = self.cart.remove_item(id);
        if changed {
            self.persist();
            tracing::debug!(%id, "item removed");
        }
        changed
    }

    /// Add `delta` to the quantity of `id`; zero or below removes it.
    ///
    /// Raising a line past the per-item cap saturates and tells the user.
    pub fn update_quantity(&mut self, id: ProductId, delta: i64) -> bool {
        let capped = self.cart.get(id).and_then(|line| {
            let requested = i64::from(line.quantity).saturating_add(delta);
            (requested > i64::from(self.cart.max_quantity_per_item())).then(|| line.name.clone())
        });

        let changed = self.cart.update_quantity(id, delta);
        if changed {
            self.persist();
            tracing::debug!(%id, delta, "quantity updated");
        }
        if let Some(name) = capped {
            self.notify(
                Severity::Info,
                format!("{} is already at the maximum quantity", name),
            );
        }
        changed
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> bool {
        let changed = self.cart.clear();
        if changed {
            self.persist();
            tracing::debug!("cart cleared");
        }
        changed
    }

    /// Sum of `price * quantity` in the base currency.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Sum of quantities.
    pub fn count(&self) -> u64 {
        self.cart.count()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Get a line by product id.
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.cart.get(id)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.cart.line_count()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// The underlying cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    fn persist(&self) {
        self.store.save(self.cart.items());
    }

    fn notify(&self, severity: Severity, message: impl Into<String>) {
        self.notifier
            .notify(Notification::new(severity, message, self.notification_ttl));
    }
}
