//! The storefront: one object owning all cart and currency state.
//!
//! Every mutation goes through here. A mutation that changes state is
//! persisted by its owner and then published to every registered surface in
//! one step; no-ops publish nothing.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use shelf_cache::Cache;

use crate::cart::{CartEngine, LineItem, ProductInput};
use crate::checkout::CheckoutSnapshot;
use crate::currency::{CurrencySelection, CurrencyTable, CurrentCurrency};
use crate::ids::ProductId;
use crate::money::Money;
use crate::notify::{Notification, Notifier, Severity};
use crate::settings::StorefrontSettings;
use crate::sync::{Projection, Surface, SyncCause, SyncHub};

/// Cart, currency selection and the surfaces that show them.
pub struct Storefront {
    engine: CartEngine,
    selection: CurrencySelection,
    hub: SyncHub,
    notifier: Rc<dyn Notifier>,
    notification_ttl: Duration,
}

impl Storefront {
    /// Restore a storefront from `cache` using the built-in currency table.
    pub fn open(cache: Cache, settings: &StorefrontSettings, notifier: Rc<dyn Notifier>) -> Self {
        Self::open_with_table(cache, CurrencyTable::builtin(), settings, notifier)
    }

    /// Restore a storefront from `cache` with a custom currency table.
    pub fn open_with_table(
        cache: Cache,
        table: Arc<CurrencyTable>,
        settings: &StorefrontSettings,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        let engine = CartEngine::load(cache.clone(), settings, notifier.clone());
        let selection = CurrencySelection::load(cache, table);
        tracing::debug!(
            currency = selection.code(),
            units = engine.count(),
            "storefront opened"
        );

        Self {
            engine,
            selection,
            hub: SyncHub::new(),
            notifier,
            notification_ttl: settings.notification_ttl(),
        }
    }

    /// Add one unit of `product`.
    pub fn add_item(&mut self, product: ProductInput) -> bool {
        let changed = self.engine.add_item(product);
        self.publish_if(changed, SyncCause::CartChanged)
    }

    /// Remove the line for `id`.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let changed = self.engine.remove_item(id);
        self.publish_if(changed, SyncCause::CartChanged)
    }

    /// Adjust the quantity of `id` by `delta`.
    pub fn update_quantity(&mut self, id: ProductId, delta: i64) -> bool {
        let changed = self.engine.update_quantity(id, delta);
        self.publish_if(changed, SyncCause::CartChanged)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> bool {
        let changed = self.engine.clear();
        self.publish_if(changed, SyncCause::CartChanged)
    }

    /// Select the display currency. Unknown codes are ignored.
    pub fn set_currency(&mut self, code: &str) -> bool {
        let changed = self.selection.set_currency(code);
        self.publish_if(changed, SyncCause::CurrencyChanged)
    }

    /// Called once the payment collaborator reports success.
    pub fn complete_checkout(&mut self) -> bool {
        tracing::info!(units = self.engine.count(), "checkout completed");
        self.clear_cart()
    }

    /// The selected currency.
    pub fn current_currency(&self) -> CurrentCurrency {
        self.selection.current()
    }

    /// Format a base amount in `code`.
    pub fn format(&self, amount: Money, code: &str) -> String {
        self.selection.formatter().format(amount, code)
    }

    /// Format a base amount in the selected currency.
    pub fn format_current(&self, amount: Money) -> String {
        self.selection.formatter().format_current(amount)
    }

    /// Convert a base amount to `code`, unrounded.
    pub fn convert(&self, amount: Money, code: &str) -> f64 {
        self.selection.formatter().convert(amount, code)
    }

    /// Base-currency total.
    pub fn total(&self) -> Money {
        self.engine.total()
    }

    /// Total units in the cart.
    pub fn count(&self) -> u64 {
        self.engine.count()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.engine.items()
    }

    /// Get a line by product id.
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.engine.get(id)
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// The currency selection.
    pub fn selection(&self) -> &CurrencySelection {
        &self.selection
    }

    /// Project the current state.
    pub fn projection(&self) -> Projection {
        Projection::build(self.engine.cart(), &self.selection)
    }

    /// Copy the cart for checkout.
    pub fn snapshot(&self) -> CheckoutSnapshot {
        CheckoutSnapshot::capture(self.engine.cart(), &self.selection)
    }

    /// Register a surface and render the current state into it.
    pub fn register_surface<S: Surface + 'static>(&mut self, surface: S) -> Rc<RefCell<S>> {
        let handle = self.hub.register(surface);
        handle
            .borrow_mut()
            .render(&self.projection(), SyncCause::Initial);
        handle
    }

    /// Re-render every surface, for example after binding new product prices.
    pub fn sync(&self) {
        self.hub.publish(&self.projection(), SyncCause::Initial);
    }

    /// Show a message to the shopper.
    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        self.notifier
            .notify(Notification::new(severity, message, self.notification_ttl));
    }

    fn publish_if(&self, changed: bool, cause: SyncCause) -> bool {
        if changed {
            self.hub.publish(&self.projection(), cause);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationTray;
    use crate::sync::{CartDrawer, HeaderBadge, ProductPrices};

    #[derive(Default)]
    struct Counter {
        causes: Vec<SyncCause>,
    }

    impl Surface for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn render(&mut self, _projection: &Projection, cause: SyncCause) {
            self.causes.push(cause);
        }
    }

    fn open(cache: Cache) -> Storefront {
        Storefront::open(
            cache,
            &StorefrontSettings::default(),
            Rc::new(NotificationTray::new()),
        )
    }

    fn mug() -> ProductInput {
        ProductInput::new(7_u64, "Mug", 25.0, "/img/mug.jpg")
    }

    #[test]
    fn test_register_renders_immediately() {
        let mut storefront = open(Cache::in_memory());
        storefront.add_item(mug());

        let badge = storefront.register_surface(HeaderBadge::new("header"));
        assert_eq!(badge.borrow().text, "1");
    }

    #[test]
    fn test_one_publish_per_change() {
        let mut storefront = open(Cache::in_memory());
        let counter = storefront.register_surface(Counter::default());

        storefront.add_item(mug());
        storefront.update_quantity(ProductId::new(7), 2);
        storefront.remove_item(ProductId::new(99));
        storefront.set_currency("XYZ");
        storefront.set_currency("eur");
        storefront.clear_cart();
        storefront.clear_cart();

        assert_eq!(
            counter.borrow().causes,
            vec![
                SyncCause::Initial,
                SyncCause::CartChanged,
                SyncCause::CartChanged,
                SyncCause::CurrencyChanged,
                SyncCause::CartChanged,
            ]
        );
    }

    #[test]
    fn test_currency_change_reaches_all_prices() {
        let mut storefront = open(Cache::in_memory());
        storefront.add_item(mug());
        let drawer = storefront.register_surface(CartDrawer::new());
        let prices = storefront.register_surface(ProductPrices::new());
        prices
            .borrow_mut()
            .bind(ProductId::new(7), Money::from_decimal(25.0));
        storefront.sync();

        storefront.set_currency("JPY");

        assert_eq!(drawer.borrow().total, "\u{00a5}3,738");
        assert_eq!(drawer.borrow().rows[0].unit_price, "\u{00a5}3,738");
        assert_eq!(
            prices.borrow().rendered.get(&ProductId::new(7)).cloned(),
            Some("\u{00a5}3,738".to_string())
        );
        assert_eq!(storefront.current_currency().code, "JPY");
    }

    #[test]
    fn test_state_survives_reopen() {
        let cache = Cache::in_memory();
        {
            let mut storefront = open(cache.clone());
            storefront.add_item(mug());
            storefront.add_item(mug());
            storefront.set_currency("GBP");
        }

        let storefront = open(cache);
        assert_eq!(storefront.count(), 2);
        assert_eq!(storefront.total(), Money::from_decimal(50.0));
        assert_eq!(storefront.current_currency().code, "GBP");
        assert_eq!(storefront.format_current(storefront.total()), "\u{00a3}39.50");
    }

    #[test]
    fn test_complete_checkout_clears_cart() {
        let mut storefront = open(Cache::in_memory());
        storefront.add_item(mug());
        let badge = storefront.register_surface(HeaderBadge::new("header"));

        assert!(storefront.complete_checkout());
        assert!(storefront.is_empty());
        assert!(!badge.borrow().visible);
    }
}
