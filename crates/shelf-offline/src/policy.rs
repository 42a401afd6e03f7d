//! Which fetch strategy applies to a request.

use http::{Method, Uri};
use serde::{Deserialize, Serialize};

use crate::error::{OfflineError, OfflineResult};

/// Default cache generation.
pub const DEFAULT_CACHE_VERSION: &str = "v1";

/// How a request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// Serve the cached copy; fetch and store on a miss.
    CacheFirst,
    /// Fetch and refresh the cache; fall back to the cached copy offline.
    NetworkFirst,
    /// Go straight to the network. The cache is never touched.
    Passthrough,
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CacheFirst => write!(f, "cache-first"),
            Self::NetworkFirst => write!(f, "network-first"),
            Self::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// Offline caching rules for one storefront origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflinePolicy {
    /// Storefront origin, e.g. `https://shop.example.com`.
    pub origin: String,
    /// Host of the API backend. Its requests are never cached.
    pub backend_host: Option<String>,
    /// Same-origin paths precached at install and served cache-first.
    pub core_assets: Vec<String>,
    /// Cache generation; caches of other generations are dropped at activation.
    pub cache_version: String,
}

impl OfflinePolicy {
    /// Create a policy for `origin` with no core assets.
    pub fn new(origin: impl Into<String>) -> OfflineResult<Self> {
        let origin = origin.into().trim_end_matches('/').to_string();
        let uri: Uri = origin
            .parse()
            .map_err(|_| OfflineError::InvalidOrigin(origin.clone()))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(OfflineError::InvalidOrigin(origin));
        }

        Ok(Self {
            origin,
            backend_host: None,
            core_assets: Vec::new(),
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
        })
    }

    /// Set the backend host.
    pub fn with_backend_host(mut self, host: impl Into<String>) -> Self {
        self.backend_host = Some(host.into());
        self
    }

    /// Add a core asset path.
    pub fn with_core_asset(mut self, path: impl Into<String>) -> Self {
        self.core_assets.push(path.into());
        self
    }

    /// Set the cache generation.
    pub fn with_cache_version(mut self, version: impl Into<String>) -> Self {
        self.cache_version = version.into();
        self
    }

    /// Name of the cache for the current generation.
    pub fn cache_name(&self) -> String {
        format!("shelf-{}", self.cache_version)
    }

    /// Absolute URI of a same-origin path.
    pub fn resolve(&self, path: &str) -> OfflineResult<Uri> {
        let uri = format!("{}{}", self.origin, path);
        uri.parse::<Uri>()
            .map_err(|e| OfflineError::Http(http::Error::from(e)))
    }

    /// Pick the strategy for a request.
    ///
    /// Relative URIs are treated as same-origin.
    pub fn strategy_for(&self, method: &Method, uri: &Uri) -> FetchStrategy {
        if *method != Method::GET {
            return FetchStrategy::Passthrough;
        }

        if let Some(host) = uri.host() {
            if self
                .backend_host
                .as_deref()
                .is_some_and(|backend| backend.eq_ignore_ascii_case(host))
            {
                return FetchStrategy::Passthrough;
            }
            if !self.is_same_origin(uri) {
                return FetchStrategy::Passthrough;
            }
        }

        if self.core_assets.iter().any(|asset| asset == uri.path()) {
            FetchStrategy::CacheFirst
        } else {
            FetchStrategy::NetworkFirst
        }
    }

    fn is_same_origin(&self, uri: &Uri) -> bool {
        let Ok(origin) = self.origin.parse::<Uri>() else {
            return false;
        };
        origin.scheme() == uri.scheme()
            && origin
                .authority()
                .zip(uri.authority())
                .is_some_and(|(a, b)| a.as_str().eq_ignore_ascii_case(b.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> OfflinePolicy {
        OfflinePolicy::new("https://shop.example.com/")
            .unwrap()
            .with_backend_host("api.example.com")
            .with_core_asset("/")
            .with_core_asset("/index.html")
            .with_core_asset("/css/styles.css")
    }

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_non_get_passes_through() {
        let p = policy();
        assert_eq!(
            p.strategy_for(&Method::POST, &uri("https://shop.example.com/index.html")),
            FetchStrategy::Passthrough
        );
    }

    #[test]
    fn test_backend_and_cross_origin_pass_through() {
        let p = policy();
        assert_eq!(
            p.strategy_for(&Method::GET, &uri("https://api.example.com/products")),
            FetchStrategy::Passthrough
        );
        assert_eq!(
            p.strategy_for(&Method::GET, &uri("https://cdn.other.net/font.woff2")),
            FetchStrategy::Passthrough
        );
        assert_eq!(
            p.strategy_for(&Method::GET, &uri("http://shop.example.com/index.html")),
            FetchStrategy::Passthrough
        );
    }

    #[test]
    fn test_core_assets_are_cache_first() {
        let p = policy();
        assert_eq!(
            p.strategy_for(&Method::GET, &uri("https://shop.example.com/css/styles.css")),
            FetchStrategy::CacheFirst
        );
        assert_eq!(
            p.strategy_for(&Method::GET, &uri("/index.html")),
            FetchStrategy::CacheFirst
        );
    }

    #[test]
    fn test_other_same_origin_is_network_first() {
        let p = policy();
        assert_eq!(
            p.strategy_for(&Method::GET, &uri("https://shop.example.com/products/7")),
            FetchStrategy::NetworkFirst
        );
        assert_eq!(p.strategy_for(&Method::GET, &uri("/about")), FetchStrategy::NetworkFirst);
    }

    #[test]
    fn test_origin_must_be_absolute() {
        assert!(matches!(
            OfflinePolicy::new("/relative"),
            Err(OfflineError::InvalidOrigin(_))
        ));
        assert_eq!(policy().origin, "https://shop.example.com");
        assert_eq!(policy().cache_name(), "shelf-v1");
        assert_eq!(
            policy().resolve("/index.html").unwrap().to_string(),
            "https://shop.example.com/index.html"
        );
    }
}
