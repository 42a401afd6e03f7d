//! Price formatting and conversion.

use std::sync::Arc;

use crate::currency::table::{CurrencyEntry, CurrencyTable};
use crate::money::Money;

/// Converts canonical base amounts into a display currency.
///
/// Holds the table and the code to use when none is given. Formatting is a
/// pure function of `(amount, code, table)`.
#[derive(Debug, Clone)]
pub struct PriceFormatter {
    table: Arc<CurrencyTable>,
    selected: String,
}

impl PriceFormatter {
    /// Create a formatter whose default currency is `selected`.
    pub fn new(table: Arc<CurrencyTable>, selected: impl Into<String>) -> Self {
        Self {
            table,
            selected: selected.into(),
        }
    }

    /// The code used by [`format_current`](Self::format_current).
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// The underlying table.
    pub fn table(&self) -> &CurrencyTable {
        &self.table
    }

    /// Format `amount` in `code`.
    ///
    /// Unknown codes fall back to the base symbol with two decimals and no
    /// conversion.
    pub fn format(&self, amount: Money, code: &str) -> String {
        match self.table.get(code) {
            Some(entry) => {
                let value = amount.to_decimal() * entry.rate;
                render(&entry.symbol, value, entry.display_decimals)
            }
            None => render(&self.table.base().symbol, amount.to_decimal(), 2),
        }
    }

    /// Format `amount` in the selected currency.
    pub fn format_current(&self, amount: Money) -> String {
        self.format(amount, &self.selected)
    }

    /// Convert `amount` to `code`, unrounded. Unknown codes use rate 1.
    pub fn convert(&self, amount: Money, code: &str) -> f64 {
        let rate = self.table.get(code).map_or(1.0, |e| e.rate);
        amount.to_decimal() * rate
    }

    /// Convert `amount` to the selected currency, unrounded.
    pub fn convert_current(&self, amount: Money) -> f64 {
        self.convert(amount, &self.selected)
    }

    /// Convert `amount` to whole minor units of `code` (cents, or yen for a
    /// zero-decimal currency), as payment providers expect.
    pub fn minor_units(&self, amount: Money, code: &str) -> i64 {
        let decimals = self
            .table
            .get(code)
            .map_or(2, |e: &CurrencyEntry| e.display_decimals);
        let scale = 10_f64.powi(i32::from(decimals));
        (self.convert(amount, code) * scale).round() as i64
    }
}

/// Render `value` with `decimals` digits, thousands grouping and `symbol`.
fn render(symbol: &str, value: f64, decimals: u8) -> String {
    let digits = format!("{:.*}", usize::from(decimals), value.abs());
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let is_zero = digits.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    let mut out = format!("{}{}{}", sign, symbol, group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> PriceFormatter {
        PriceFormatter::new(CurrencyTable::builtin(), "USD")
    }

    #[test]
    fn test_format_zero_decimal_currency() {
        let f = formatter();
        assert_eq!(f.format(Money::from_decimal(100.0), "JPY"), "\u{00a5}14,950");
    }

    #[test]
    fn test_format_two_decimal_currency() {
        let f = formatter();
        assert_eq!(f.format(Money::from_decimal(100.0), "EUR"), "\u{20ac}92.00");
        assert_eq!(f.format(Money::from_decimal(1234.5), "USD"), "$1,234.50");
    }

    #[test]
    fn test_format_unknown_code_uses_base() {
        let f = formatter();
        assert_eq!(f.format(Money::from_decimal(1999.99), "ZZZ"), "$1,999.99");
    }

    #[test]
    fn test_format_rounds_whole_units() {
        let f = formatter();
        // 0.99 * 149.5 = 148.005 yen
        assert_eq!(f.format(Money::from_decimal(0.99), "JPY"), "\u{00a5}148");
        assert_eq!(f.format(Money::from_decimal(2.0), "NGN"), "\u{20a6}3,100");
        assert_eq!(f.format(Money::from_decimal(10.0), "XOF"), "CFA 6,050");
    }

    #[test]
    fn test_format_current_follows_selection() {
        let f = PriceFormatter::new(CurrencyTable::builtin(), "GBP");
        assert_eq!(f.format_current(Money::from_decimal(10.0)), "\u{00a3}7.90");
        assert_eq!(f.selected(), "GBP");
    }

    #[test]
    fn test_convert_is_unrounded() {
        let f = formatter();
        let converted = f.convert(Money::from_decimal(1.0), "JPY");
        assert!((converted - 149.5).abs() < 1e-9);
        assert!((f.convert(Money::from_decimal(3.0), "nope") - 3.0).abs() < 1e-9);

        let gbp = PriceFormatter::new(CurrencyTable::builtin(), "GBP");
        assert!((gbp.convert_current(Money::from_decimal(10.0)) - 7.9).abs() < 1e-9);
    }

    #[test]
    fn test_minor_units() {
        let f = formatter();
        assert_eq!(f.minor_units(Money::from_decimal(25.0), "USD"), 2500);
        assert_eq!(f.minor_units(Money::from_decimal(25.0), "EUR"), 2300);
        assert_eq!(f.minor_units(Money::from_decimal(25.0), "JPY"), 3738);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn test_render_negative_and_negative_zero() {
        assert_eq!(render("$", -12.5, 2), "-$12.50");
        assert_eq!(render("$", -0.001, 2), "$0.00");
    }
}
