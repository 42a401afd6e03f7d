//! Immutable view of cart and currency state handed to surfaces.

use serde::Serialize;

use crate::cart::Cart;
use crate::currency::{CurrencySelection, CurrentCurrency, PriceFormatter};
use crate::ids::ProductId;
use crate::money::Money;

/// Why a publish happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncCause {
    /// First render after startup or after a surface registers.
    Initial,
    /// Line items changed.
    CartChanged,
    /// The selected currency changed.
    CurrencyChanged,
}

/// One cart line, formatted in the selected currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// The cart, formatted in the selected currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// Total units.
    pub count: u64,
    /// Base-currency total the strings below were formatted from.
    pub total_amount: Money,
    pub subtotal: String,
    pub total: String,
}

impl CartView {
    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Everything a surface needs to render, computed once per publish.
#[derive(Debug, Clone)]
pub struct Projection {
    pub cart: CartView,
    pub currency: CurrentCurrency,
    formatter: PriceFormatter,
}

impl Projection {
    /// Project `cart` through the current `selection`.
    pub fn build(cart: &Cart, selection: &CurrencySelection) -> Self {
        let formatter = selection.formatter();
        let lines = cart
            .items()
            .iter()
            .map(|item| CartLineView {
                id: item.id,
                name: item.name.clone(),
                image: item.image.clone(),
                quantity: item.quantity,
                unit_price: formatter.format_current(item.price),
                line_total: formatter.format_current(item.line_total()),
            })
            .collect();

        let total_amount = cart.total();
        let total = formatter.format_current(total_amount);

        Self {
            cart: CartView {
                lines,
                count: cart.count(),
                total_amount,
                subtotal: total.clone(),
                total,
            },
            currency: selection.current(),
            formatter,
        }
    }

    /// Format a base amount in the selected currency.
    pub fn format(&self, amount: Money) -> String {
        self.formatter.format_current(amount)
    }

    /// The formatter used for this projection.
    pub fn formatter(&self) -> &PriceFormatter {
        &self.formatter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ProductInput;
    use crate::currency::CurrencyTable;
    use shelf_cache::Cache;

    #[test]
    fn test_projection_formats_in_selected_currency() {
        let mut cart = Cart::new();
        cart.add_item(ProductInput::new(1_u64, "Mug", 10.0, ""));
        cart.add_item(ProductInput::new(1_u64, "Mug", 10.0, ""));

        let mut selection = CurrencySelection::load(Cache::in_memory(), CurrencyTable::builtin());
        selection.set_currency("EUR");

        let projection = Projection::build(&cart, &selection);
        assert_eq!(projection.cart.count, 2);
        assert_eq!(projection.cart.lines[0].unit_price, "\u{20ac}9.20");
        assert_eq!(projection.cart.lines[0].line_total, "\u{20ac}18.40");
        assert_eq!(projection.cart.total, "\u{20ac}18.40");
        assert_eq!(projection.cart.subtotal, projection.cart.total);
        assert_eq!(projection.currency.code, "EUR");
    }

    #[test]
    fn test_empty_projection() {
        let selection = CurrencySelection::load(Cache::in_memory(), CurrencyTable::builtin());
        let projection = Projection::build(&Cart::new(), &selection);
        assert!(projection.cart.is_empty());
        assert_eq!(projection.cart.total, "$0.00");
    }
}
