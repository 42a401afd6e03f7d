//! Cart and multi-currency pricing for the Shelf storefront.
//!
//! This crate provides the client-side commerce core:
//!
//! - **Cart**: line items, quantity limits, persistence
//! - **Currency**: rate table, price formatting, the selected currency
//! - **Sync**: one projection published to every UI surface
//! - **Checkout**: snapshot and payment gateway fallback chain
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use shelf_commerce::prelude::*;
//!
//! let tray = Rc::new(NotificationTray::new());
//! let mut storefront = Storefront::open(
//!     Cache::in_memory(),
//!     &StorefrontSettings::default(),
//!     tray.clone(),
//! );
//! let badge = storefront.register_surface(HeaderBadge::new("header"));
//!
//! storefront.add_item(ProductInput::new(1_u64, "Linen Tee", 25.0, "/img/tee.jpg"));
//! storefront.set_currency("EUR");
//!
//! assert_eq!(badge.borrow().text, "1");
//! assert_eq!(storefront.format_current(storefront.total()), "€23.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod notify;
pub mod settings;

pub mod cart;
pub mod checkout;
pub mod currency;
pub mod storefront;
pub mod sync;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Money, BASE_CURRENCY};
pub use storefront::Storefront;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Money, BASE_CURRENCY};
    pub use crate::notify::{Notification, NotificationTray, Notifier, Severity, TracingNotifier};
    pub use crate::settings::StorefrontSettings;
    pub use crate::storefront::Storefront;

    // Cart
    pub use crate::cart::{AddOutcome, Cart, CartEngine, LineItem, ProductInput};

    // Currency
    pub use crate::currency::{
        CurrencyEntry, CurrencySelection, CurrencyTable, CurrentCurrency, PriceFormatter,
    };

    // Sync
    pub use crate::sync::{
        CartDrawer, CheckoutSummary, HeaderBadge, ProductPrices, Projection, Surface, SyncCause,
        SyncHub,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutBridge, CheckoutOutcome, CheckoutSnapshot, HostedCheckoutRedirect, PaymentError,
        PaymentGateway, PaymentHandoff,
    };

    pub use shelf_cache::Cache;
}
