//! Payment gateways the bridge hands off to.

use serde::Serialize;
use url::Url;

use crate::checkout::CheckoutSnapshot;
use crate::ids::CheckoutId;

/// Errors raised by a payment gateway.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The gateway is not loaded or not configured.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),

    /// The gateway refused the snapshot.
    #[error("payment rejected: {0}")]
    Rejected(String),

    /// A redirect URL could not be built.
    #[error("invalid checkout url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// What a gateway returns once it has taken over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentHandoff {
    /// Gateway that accepted the checkout.
    pub gateway: String,
    pub reference: CheckoutId,
    /// Where to send the shopper, for redirect-based gateways.
    pub redirect_url: Option<String>,
}

/// An external payment collaborator.
pub trait PaymentGateway {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether the gateway can be used right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Take over the checkout described by `snapshot`.
    fn begin(&self, snapshot: &CheckoutSnapshot) -> Result<PaymentHandoff, PaymentError>;
}

/// Hands off by redirecting to a hosted checkout page.
///
/// The query carries the reference, the amount in minor units of the
/// selected currency, and the currency code.
#[derive(Debug, Clone)]
pub struct HostedCheckoutRedirect {
    base: Option<Url>,
}

impl HostedCheckoutRedirect {
    /// Create a redirect gateway for `base`.
    pub fn new(base: &str) -> Result<Self, PaymentError> {
        Ok(Self {
            base: Some(Url::parse(base)?),
        })
    }

    /// A gateway with no target. Never available.
    pub fn unconfigured() -> Self {
        Self { base: None }
    }

    /// Build from an optional configured url. Bad urls leave the gateway
    /// unconfigured.
    pub fn from_config(base: Option<&str>) -> Self {
        match base.map(Self::new) {
            Some(Ok(gateway)) => gateway,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring hosted checkout url");
                Self::unconfigured()
            }
            None => Self::unconfigured(),
        }
    }

    /// Redirect target for `snapshot`.
    pub fn redirect_url(&self, snapshot: &CheckoutSnapshot) -> Result<Url, PaymentError> {
        let mut url = self
            .base
            .clone()
            .ok_or_else(|| PaymentError::Unavailable("no hosted checkout url".to_string()))?;
        url.query_pairs_mut()
            .append_pair("reference", snapshot.reference.as_str())
            .append_pair("amount", &snapshot.amount_minor.to_string())
            .append_pair("currency", &snapshot.currency.code);
        Ok(url)
    }
}

impl PaymentGateway for HostedCheckoutRedirect {
    fn name(&self) -> &str {
        "hosted-redirect"
    }

    fn is_available(&self) -> bool {
        self.base.is_some()
    }

    fn begin(&self, snapshot: &CheckoutSnapshot) -> Result<PaymentHandoff, PaymentError> {
        if snapshot.amount_minor <= 0 {
            return Err(PaymentError::Rejected("nothing to charge".to_string()));
        }
        let url = self.redirect_url(snapshot)?;
        Ok(PaymentHandoff {
            gateway: self.name().to_string(),
            reference: snapshot.reference.clone(),
            redirect_url: Some(url.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, ProductInput};
    use crate::currency::{CurrencySelection, CurrencyTable};
    use shelf_cache::Cache;

    fn snapshot(code: &str) -> CheckoutSnapshot {
        let mut cart = Cart::new();
        cart.add_item(ProductInput::new(1_u64, "Mug", 12.5, ""));
        let mut selection = CurrencySelection::load(Cache::in_memory(), CurrencyTable::builtin());
        selection.set_currency(code);
        CheckoutSnapshot::capture(&cart, &selection)
    }

    #[test]
    fn test_redirect_query() {
        let gateway = HostedCheckoutRedirect::new("https://pay.example.com/checkout").unwrap();
        let snapshot = snapshot("USD");
        let handoff = gateway.begin(&snapshot).unwrap();

        assert_eq!(handoff.gateway, "hosted-redirect");
        assert_eq!(handoff.reference, snapshot.reference);
        let url = Url::parse(handoff.redirect_url.as_deref().unwrap()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("reference".to_string(), snapshot.reference.to_string()),
                ("amount".to_string(), "1250".to_string()),
                ("currency".to_string(), "USD".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_decimal_amount() {
        let gateway = HostedCheckoutRedirect::new("https://pay.example.com/").unwrap();
        let url = gateway.redirect_url(&snapshot("JPY")).unwrap();
        assert!(url.query().unwrap().contains("amount=1869"));
        assert!(url.query().unwrap().contains("currency=JPY"));
    }

    #[test]
    fn test_unconfigured_is_unavailable() {
        let gateway = HostedCheckoutRedirect::from_config(None);
        assert!(!gateway.is_available());
        assert!(matches!(
            gateway.begin(&snapshot("USD")),
            Err(PaymentError::Unavailable(_))
        ));

        assert!(!HostedCheckoutRedirect::from_config(Some("not a url")).is_available());
    }
}
