//! Ordered fallback chain of payment gateways.

use serde::Serialize;

use crate::checkout::{CheckoutSnapshot, PaymentGateway, PaymentHandoff};
use crate::notify::Severity;
use crate::storefront::Storefront;

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// Nothing to check out. No gateway was called.
    CartEmpty,
    /// A gateway took over.
    HandedOff {
        snapshot: CheckoutSnapshot,
        handoff: PaymentHandoff,
    },
    /// Every gateway was unavailable or failed.
    Unavailable,
}

/// Hands the cart to the first gateway that accepts it.
///
/// Gateways are tried in registration order. A failing gateway is logged and
/// the next one is tried. The cart is never modified here; clearing it after
/// payment is [`Storefront::complete_checkout`].
#[derive(Default)]
pub struct CheckoutBridge {
    gateways: Vec<Box<dyn PaymentGateway>>,
}

impl CheckoutBridge {
    /// Create a bridge with no gateways.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a gateway to the chain.
    pub fn with_gateway(mut self, gateway: impl PaymentGateway + 'static) -> Self {
        self.gateways.push(Box::new(gateway));
        self
    }

    /// Number of gateways in the chain.
    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    /// Check if the chain has no gateways.
    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    /// Start checkout for the storefront's current cart.
    pub fn checkout(&self, storefront: &Storefront) -> CheckoutOutcome {
        if storefront.is_empty() {
            storefront.notify(Severity::Error, "Your cart is empty");
            return CheckoutOutcome::CartEmpty;
        }

        let snapshot = storefront.snapshot();
        for gateway in &self.gateways {
            if !gateway.is_available() {
                tracing::debug!(gateway = gateway.name(), "gateway not available");
                continue;
            }

            match gateway.begin(&snapshot) {
                Ok(handoff) => {
                    tracing::info!(
                        gateway = gateway.name(),
                        reference = %snapshot.reference,
                        total = %snapshot.total,
                        currency = %snapshot.currency.code,
                        "checkout handed off"
                    );
                    return CheckoutOutcome::HandedOff { snapshot, handoff };
                }
                Err(e) => {
                    tracing::warn!(gateway = gateway.name(), error = %e, "gateway failed");
                }
            }
        }

        storefront.notify(Severity::Error, "Checkout is currently unavailable");
        CheckoutOutcome::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ProductInput;
    use crate::checkout::{HostedCheckoutRedirect, PaymentError};
    use crate::notify::NotificationTray;
    use crate::settings::StorefrontSettings;
    use shelf_cache::Cache;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Failing;

    impl PaymentGateway for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn begin(&self, _snapshot: &CheckoutSnapshot) -> Result<PaymentHandoff, PaymentError> {
            Err(PaymentError::Rejected("declined".to_string()))
        }
    }

    struct Recording {
        calls: Rc<Cell<u32>>,
    }

    impl PaymentGateway for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn begin(&self, snapshot: &CheckoutSnapshot) -> Result<PaymentHandoff, PaymentError> {
            self.calls.set(self.calls.get() + 1);
            Ok(PaymentHandoff {
                gateway: self.name().to_string(),
                reference: snapshot.reference.clone(),
                redirect_url: None,
            })
        }
    }

    fn storefront() -> (Storefront, Rc<NotificationTray>) {
        let tray = Rc::new(NotificationTray::new());
        let storefront =
            Storefront::open(Cache::in_memory(), &StorefrontSettings::default(), tray.clone());
        (storefront, tray)
    }

    #[test]
    fn test_empty_cart_skips_gateways() {
        let (storefront, tray) = storefront();
        let calls = Rc::new(Cell::new(0));
        let bridge = CheckoutBridge::new().with_gateway(Recording {
            calls: calls.clone(),
        });

        assert_eq!(bridge.checkout(&storefront), CheckoutOutcome::CartEmpty);
        assert_eq!(calls.get(), 0);
        let last = tray.last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(last.message, "Your cart is empty");
    }

    #[test]
    fn test_falls_through_to_next_gateway() {
        let (mut storefront, _) = storefront();
        storefront.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));

        let calls = Rc::new(Cell::new(0));
        let bridge = CheckoutBridge::new()
            .with_gateway(HostedCheckoutRedirect::unconfigured())
            .with_gateway(Failing)
            .with_gateway(Recording {
                calls: calls.clone(),
            });

        match bridge.checkout(&storefront) {
            CheckoutOutcome::HandedOff { snapshot, handoff } => {
                assert_eq!(handoff.gateway, "recording");
                assert_eq!(handoff.reference, snapshot.reference);
                assert_eq!(snapshot.item_count, 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(storefront.count(), 1);
    }

    #[test]
    fn test_no_gateway_is_unavailable() {
        let (mut storefront, tray) = storefront();
        storefront.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));

        let bridge = CheckoutBridge::new().with_gateway(Failing);
        assert_eq!(bridge.checkout(&storefront), CheckoutOutcome::Unavailable);
        assert_eq!(
            tray.last().map(|n| n.message),
            Some("Checkout is currently unavailable".to_string())
        );
        assert_eq!(storefront.count(), 1);
    }
}
