//! Process-wide selected display currency.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shelf_cache::Cache;

use crate::currency::format::PriceFormatter;
use crate::currency::table::CurrencyTable;

/// Storage key holding the selected currency code.
pub const CURRENCY_KEY: &str = "selected_currency";

/// The selected currency as seen by readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentCurrency {
    /// ISO code.
    pub code: String,
    /// Display symbol.
    pub symbol: String,
    /// Human-readable name.
    pub display_name: String,
    /// Multiplier from the base currency.
    pub rate: f64,
}

/// Single writer of the selected currency code.
///
/// The stored code is kept verbatim even when it is not in the table; the
/// effective code then falls back to the base currency for display.
#[derive(Debug, Clone)]
pub struct CurrencySelection {
    table: Arc<CurrencyTable>,
    stored: String,
    cache: Cache,
}

impl CurrencySelection {
    /// Restore the selection from storage, defaulting to the base currency.
    pub fn load(cache: Cache, table: Arc<CurrencyTable>) -> Self {
        let stored = match cache.get::<String>(CURRENCY_KEY) {
            Ok(Some(code)) => code,
            Ok(None) => table.base().code.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to restore selected currency, using base");
                table.base().code.clone()
            }
        };

        if !table.contains(&stored) {
            tracing::debug!(stored = %stored, "stored currency not in table, displaying base");
        }

        Self {
            table,
            stored,
            cache,
        }
    }

    /// Select `code`.
    ///
    /// Returns `false` and changes nothing when the code is not in the
    /// table. A persistence failure is logged; the in-memory selection still
    /// changes.
    pub fn set_currency(&mut self, code: &str) -> bool {
        let Some(entry) = self.table.get(code) else {
            tracing::debug!(code, "ignoring unknown currency");
            return false;
        };

        self.stored = entry.code.clone();
        if let Err(e) = self.cache.set(CURRENCY_KEY, &self.stored) {
            tracing::warn!(error = %e, code = %self.stored, "failed to persist selected currency");
        }
        tracing::debug!(code = %self.stored, "currency selected");
        true
    }

    /// The effective code: the stored one if known, else the base.
    pub fn code(&self) -> &str {
        match self.table.get(&self.stored) {
            Some(entry) => &entry.code,
            None => &self.table.base().code,
        }
    }

    /// The code exactly as stored.
    pub fn stored_code(&self) -> &str {
        &self.stored
    }

    /// The current `{code, symbol, display_name, rate}`.
    pub fn current(&self) -> CurrentCurrency {
        let entry = self
            .table
            .get(&self.stored)
            .unwrap_or_else(|| self.table.base());
        CurrentCurrency {
            code: entry.code.clone(),
            symbol: entry.symbol.clone(),
            display_name: entry.display_name.clone(),
            rate: entry.rate,
        }
    }

    /// A formatter bound to the effective code.
    pub fn formatter(&self) -> PriceFormatter {
        PriceFormatter::new(Arc::clone(&self.table), self.code())
    }

    /// The currency table.
    pub fn table(&self) -> &Arc<CurrencyTable> {
        &self.table
    }
}
