//! Checkout bridge.
//!
//! Takes a snapshot of the cart in the selected currency and hands it to the
//! first payment gateway that accepts it.

mod bridge;
mod gateway;
mod snapshot;

pub use bridge::{CheckoutBridge, CheckoutOutcome};
pub use gateway::{HostedCheckoutRedirect, PaymentError, PaymentGateway, PaymentHandoff};
pub use snapshot::CheckoutSnapshot;
