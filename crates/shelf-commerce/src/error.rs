//! Commerce error types.
//!
//! Cart and currency mutations have no error channel; misses are no-ops and
//! storage failures are logged at the store boundary. Errors surface only
//! from construction.

use thiserror::Error;

/// Errors that can occur while setting up the storefront.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Currency table rejected at construction.
    #[error("Invalid currency table: {0}")]
    InvalidCurrencyTable(String),
}
