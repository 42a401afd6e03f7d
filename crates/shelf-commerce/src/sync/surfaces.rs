//! Built-in surfaces.
//!
//! Each surface keeps only what it last rendered. Every render replaces that
//! state wholesale from the projection.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ids::ProductId;
use crate::money::Money;
use crate::sync::{Projection, Surface, SyncCause};

/// Cart count badge in a page header.
///
/// Register one per badge element; legacy and redesigned headers each get
/// their own instance and stay identical because they render the same
/// projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderBadge {
    name: String,
    pub text: String,
    pub visible: bool,
}

impl HeaderBadge {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Surface for HeaderBadge {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&mut self, projection: &Projection, _cause: SyncCause) {
        self.text = projection.cart.count.to_string();
        self.visible = projection.cart.count > 0;
    }
}

/// One row in the cart drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawerRow {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Slide-out cart drawer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartDrawer {
    pub rows: Vec<DrawerRow>,
    pub subtotal: String,
    pub total: String,
    /// Set when the cart is empty.
    pub empty_message: Option<String>,
}

impl CartDrawer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for CartDrawer {
    fn name(&self) -> &str {
        "cart-drawer"
    }

    fn render(&mut self, projection: &Projection, _cause: SyncCause) {
        let cart = &projection.cart;
        self.rows = cart
            .lines
            .iter()
            .map(|line| DrawerRow {
                id: line.id,
                name: line.name.clone(),
                image: line.image.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price.clone(),
                line_total: line.line_total.clone(),
            })
            .collect();
        self.subtotal = cart.subtotal.clone();
        self.total = cart.total.clone();
        self.empty_message = cart.is_empty().then(|| "Your cart is empty".to_string());
    }
}

/// Order summary inside the checkout modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    /// `"<name> x <qty>"` paired with the formatted line total.
    pub lines: Vec<(String, String)>,
    pub item_count: u64,
    pub subtotal: String,
    pub total: String,
    pub currency_code: String,
}

impl CheckoutSummary {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for CheckoutSummary {
    fn name(&self) -> &str {
        "checkout-summary"
    }

    fn render(&mut self, projection: &Projection, _cause: SyncCause) {
        let cart = &projection.cart;
        self.lines = cart
            .lines
            .iter()
            .map(|l| (format!("{} x {}", l.name, l.quantity), l.line_total.clone()))
            .collect();
        self.item_count = cart.count;
        self.subtotal = cart.subtotal.clone();
        self.total = cart.total.clone();
        self.currency_code = projection.currency.code.clone();
    }
}

/// Per-unit product prices on listing cards and the open detail view.
///
/// Holds the base prices it is bound to and re-formats all of them on every
/// render, so a currency change reaches every card at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductPrices {
    bound: BTreeMap<ProductId, Money>,
    detail: Option<(ProductId, Money)>,
    /// Formatted price per bound product.
    pub rendered: BTreeMap<ProductId, String>,
    /// Formatted price of the open detail view.
    pub detail_text: Option<String>,
}

impl ProductPrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a listing card to `price`. Shown after the next render.
    pub fn bind(&mut self, id: ProductId, price: Money) {
        self.bound.insert(id, price);
    }

    /// Open the detail view for a product.
    pub fn open_detail(&mut self, id: ProductId, price: Money) {
        self.detail = Some((id, price));
    }

    /// Close the detail view.
    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_text = None;
    }
}

impl Surface for ProductPrices {
    fn name(&self) -> &str {
        "product-prices"
    }

    fn render(&mut self, projection: &Projection, _cause: SyncCause) {
        self.rendered = self
            .bound
            .iter()
            .map(|(id, price)| (*id, projection.format(*price)))
            .collect();
        self.detail_text = self.detail.map(|(_, price)| projection.format(price));
    }
}
