//! Point-in-time copy of the cart handed to payment gateways.

use serde::Serialize;

use crate::cart::{Cart, LineItem};
use crate::currency::{CurrencySelection, CurrentCurrency};
use crate::ids::CheckoutId;
use crate::money::Money;

/// Read-only copy of the cart at checkout.
///
/// There is no tax, shipping or discount stage, so `subtotal` and `total`
/// are always equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSnapshot {
    /// Fresh reference for this attempt.
    pub reference: CheckoutId,
    pub items: Vec<LineItem>,
    /// Base-currency subtotal.
    pub subtotal: Money,
    /// Base-currency total.
    pub total: Money,
    /// Currency the shopper selected.
    pub currency: CurrentCurrency,
    /// Total units.
    pub item_count: u64,
    /// `total` formatted in the selected currency.
    pub display_total: String,
    /// `total` in whole minor units of the selected currency.
    pub amount_minor: i64,
}

impl CheckoutSnapshot {
    /// Copy `cart` as seen through `selection`.
    pub fn capture(cart: &Cart, selection: &CurrencySelection) -> Self {
        let formatter = selection.formatter();
        let total = cart.total();
        let currency = selection.current();

        Self {
            reference: CheckoutId::generate(),
            items: cart.items().to_vec(),
            subtotal: total,
            total,
            amount_minor: formatter.minor_units(total, &currency.code),
            display_total: formatter.format_current(total),
            item_count: cart.count(),
            currency,
        }
    }

    /// Check if there is nothing to pay for.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ProductInput;
    use crate::currency::CurrencyTable;
    use shelf_cache::Cache;

    #[test]
    fn test_capture_in_selected_currency() {
        let mut cart = Cart::new();
        cart.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));
        cart.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));
        cart.add_item(ProductInput::new(2_u64, "Pin", 1.0, ""));

        let mut selection = CurrencySelection::load(Cache::in_memory(), CurrencyTable::builtin());
        selection.set_currency("JPY");

        let snapshot = CheckoutSnapshot::capture(&cart, &selection);
        assert_eq!(snapshot.total, Money::from_decimal(25.0));
        assert_eq!(snapshot.subtotal, snapshot.total);
        assert_eq!(snapshot.item_count, 3);
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.currency.code, "JPY");
        assert_eq!(snapshot.display_total, "\u{00a5}3,738");
        assert_eq!(snapshot.amount_minor, 3738);
        assert!(snapshot.reference.as_str().starts_with("chk_"));
    }

    #[test]
    fn test_each_capture_gets_new_reference() {
        let selection = CurrencySelection::load(Cache::in_memory(), CurrencyTable::builtin());
        let a = CheckoutSnapshot::capture(&Cart::new(), &selection);
        let b = CheckoutSnapshot::capture(&Cart::new(), &selection);
        assert!(a.is_empty());
        assert_ne!(a.reference, b.reference);
    }
}
