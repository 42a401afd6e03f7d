//! Multi-currency display.
//!
//! Canonical prices live in the base currency; this module owns the static
//! conversion table, the formatter and the selected display currency.

mod format;
mod selection;
mod table;

pub use format::PriceFormatter;
pub use selection::{CurrencySelection, CurrentCurrency, CURRENCY_KEY};
pub use table::{CurrencyEntry, CurrencyTable};
