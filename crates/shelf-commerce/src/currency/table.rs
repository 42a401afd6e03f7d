//! Static currency table.

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::BASE_CURRENCY;

/// One display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyEntry {
    /// ISO code (e.g., "EUR").
    pub code: String,
    /// Symbol prefixed to formatted amounts.
    pub symbol: String,
    /// Human-readable name.
    pub display_name: String,
    /// Multiplier from the base currency.
    pub rate: f64,
    /// Flag glyph shown in the currency picker.
    #[serde(default)]
    pub flag: String,
    /// Digits after the decimal point when displaying (0 or 2).
    #[serde(default = "default_decimals")]
    pub display_decimals: u8,
}

fn default_decimals() -> u8 {
    2
}

impl CurrencyEntry {
    /// Create an entry with two display decimals.
    pub fn new(
        code: impl Into<String>,
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        rate: f64,
        flag: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
            display_name: display_name.into(),
            rate,
            flag: flag.into(),
            display_decimals: 2,
        }
    }

    /// Display whole units only.
    pub fn whole_units(mut self) -> Self {
        self.display_decimals = 0;
        self
    }
}

/// Read-only mapping of currency code to [`CurrencyEntry`].
///
/// Lookups are case-insensitive. Entry order is preserved for pickers.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyTable {
    entries: Vec<CurrencyEntry>,
}

static BUILTIN: LazyLock<Arc<CurrencyTable>> = LazyLock::new(|| {
    Arc::new(CurrencyTable {
        entries: builtin_entries(),
    })
});

impl CurrencyTable {
    /// Build a custom table.
    ///
    /// The base currency must be present, codes must be unique and rates
    /// must be positive.
    pub fn new(entries: Vec<CurrencyEntry>) -> Result<Self, CommerceError> {
        let mut seen: Vec<String> = Vec::with_capacity(entries.len());
        let mut entries = entries;

        for entry in &mut entries {
            entry.code = entry.code.trim().to_ascii_uppercase();
            if seen.contains(&entry.code) {
                return Err(CommerceError::InvalidCurrencyTable(format!(
                    "duplicate code {}",
                    entry.code
                )));
            }
            if !entry.rate.is_finite() || entry.rate <= 0.0 {
                return Err(CommerceError::InvalidCurrencyTable(format!(
                    "rate for {} must be positive",
                    entry.code
                )));
            }
            if entry.display_decimals != 0 && entry.display_decimals != 2 {
                return Err(CommerceError::InvalidCurrencyTable(format!(
                    "display_decimals for {} must be 0 or 2",
                    entry.code
                )));
            }
            seen.push(entry.code.clone());
        }

        if !seen.iter().any(|c| c == BASE_CURRENCY) {
            return Err(CommerceError::InvalidCurrencyTable(format!(
                "missing base currency {}",
                BASE_CURRENCY
            )));
        }

        Ok(Self { entries })
    }

    /// The built-in table shared by the whole process.
    pub fn builtin() -> Arc<CurrencyTable> {
        Arc::clone(&BUILTIN)
    }

    /// Look up an entry by code.
    pub fn get(&self, code: &str) -> Option<&CurrencyEntry> {
        let code = code.trim();
        self.entries
            .iter()
            .find(|e| e.code.eq_ignore_ascii_case(code))
    }

    /// Check if a code is in the table.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// The base currency entry.
    pub fn base(&self) -> &CurrencyEntry {
        // Construction guarantees the base entry exists.
        self.get(BASE_CURRENCY).unwrap_or(&self.entries[0])
    }

    /// Iterate entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyEntry> {
        self.entries.iter()
    }

    /// Number of currencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty (never true for a constructed table).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_entries() -> Vec<CurrencyEntry> {
    vec![
        CurrencyEntry::new("USD", "$", "US Dollar", 1.0, "\u{1f1fa}\u{1f1f8}"),
        CurrencyEntry::new("EUR", "\u{20ac}", "Euro", 0.92, "\u{1f1ea}\u{1f1fa}"),
        CurrencyEntry::new("GBP", "\u{00a3}", "British Pound", 0.79, "\u{1f1ec}\u{1f1e7}"),
        CurrencyEntry::new("JPY", "\u{00a5}", "Japanese Yen", 149.50, "\u{1f1ef}\u{1f1f5}")
            .whole_units(),
        CurrencyEntry::new("CAD", "CA$", "Canadian Dollar", 1.36, "\u{1f1e8}\u{1f1e6}"),
        CurrencyEntry::new("AUD", "A$", "Australian Dollar", 1.53, "\u{1f1e6}\u{1f1fa}"),
        CurrencyEntry::new("CHF", "CHF ", "Swiss Franc", 0.88, "\u{1f1e8}\u{1f1ed}"),
        CurrencyEntry::new("CNY", "CN\u{00a5}", "Chinese Yuan", 7.24, "\u{1f1e8}\u{1f1f3}"),
        CurrencyEntry::new("INR", "\u{20b9}", "Indian Rupee", 83.12, "\u{1f1ee}\u{1f1f3}"),
        CurrencyEntry::new("MXN", "MX$", "Mexican Peso", 17.05, "\u{1f1f2}\u{1f1fd}"),
        CurrencyEntry::new("BRL", "R$", "Brazilian Real", 4.97, "\u{1f1e7}\u{1f1f7}"),
        CurrencyEntry::new("ZAR", "R", "South African Rand", 18.62, "\u{1f1ff}\u{1f1e6}"),
        CurrencyEntry::new("NGN", "\u{20a6}", "Nigerian Naira", 1550.0, "\u{1f1f3}\u{1f1ec}")
            .whole_units(),
        CurrencyEntry::new("KES", "KSh ", "Kenyan Shilling", 129.0, "\u{1f1f0}\u{1f1ea}")
            .whole_units(),
        CurrencyEntry::new("GHS", "GH\u{20b5}", "Ghanaian Cedi", 15.45, "\u{1f1ec}\u{1f1ed}"),
        CurrencyEntry::new("EGP", "E\u{00a3}", "Egyptian Pound", 48.30, "\u{1f1ea}\u{1f1ec}"),
        CurrencyEntry::new("MAD", "MAD ", "Moroccan Dirham", 10.05, "\u{1f1f2}\u{1f1e6}"),
        CurrencyEntry::new("UGX", "USh ", "Ugandan Shilling", 3780.0, "\u{1f1fa}\u{1f1ec}")
            .whole_units(),
        CurrencyEntry::new("TZS", "TSh ", "Tanzanian Shilling", 2510.0, "\u{1f1f9}\u{1f1ff}")
            .whole_units(),
        CurrencyEntry::new("RWF", "FRw ", "Rwandan Franc", 1290.0, "\u{1f1f7}\u{1f1fc}")
            .whole_units(),
        CurrencyEntry::new("XOF", "CFA ", "West African CFA Franc", 605.0, "\u{1f30d}")
            .whole_units(),
        CurrencyEntry::new("XAF", "FCFA ", "Central African CFA Franc", 605.0, "\u{1f30d}")
            .whole_units(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_base() {
        let table = CurrencyTable::builtin();
        assert_eq!(table.base().code, "USD");
        assert_eq!(table.base().rate, 1.0);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = CurrencyTable::builtin();
        assert_eq!(table.get("eur").map(|e| e.rate), Some(0.92));
        assert!(table.contains(" jpy "));
        assert!(!table.contains("ZZZ"));
    }

    #[test]
    fn test_zero_decimal_entries_are_flagged() {
        let table = CurrencyTable::builtin();
        let whole: Vec<&str> = table
            .iter()
            .filter(|e| e.display_decimals == 0)
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(
            whole,
            vec!["JPY", "NGN", "KES", "UGX", "TZS", "RWF", "XOF", "XAF"]
        );
    }

    #[test]
    fn test_custom_table_requires_base() {
        let result = CurrencyTable::new(vec![CurrencyEntry::new("EUR", "\u{20ac}", "Euro", 0.9, "")]);
        assert!(matches!(result, Err(CommerceError::InvalidCurrencyTable(_))));
    }

    #[test]
    fn test_custom_table_rejects_duplicates_and_bad_rates() {
        let dup = CurrencyTable::new(vec![
            CurrencyEntry::new("USD", "$", "US Dollar", 1.0, ""),
            CurrencyEntry::new("usd", "$", "Again", 1.0, ""),
        ]);
        assert!(dup.is_err());

        let zero_rate = CurrencyTable::new(vec![
            CurrencyEntry::new("USD", "$", "US Dollar", 1.0, ""),
            CurrencyEntry::new("EUR", "\u{20ac}", "Euro", 0.0, ""),
        ]);
        assert!(zero_rate.is_err());
    }

    #[test]
    fn test_custom_table_normalizes_codes() {
        let table = CurrencyTable::new(vec![
            CurrencyEntry::new("usd", "$", "US Dollar", 1.0, ""),
            CurrencyEntry::new(" sek ", "kr ", "Swedish Krona", 10.4, ""),
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("SEK").map(|e| e.code.as_str()), Some("SEK"));
    }
}
