//! Offline caching for the Shelf storefront.
//!
//! Models the storefront's fetch interception:
//!
//! - [`OfflinePolicy`] - decides the [`FetchStrategy`] for each request
//! - [`OfflineCache`] - precaches core assets, drops stale generations and
//!   serves requests cache-first, network-first or straight through
//! - [`CacheStorage`] - named response caches ([`MemoryCacheStorage`] in process)
//!
//! # Example
//!
//! ```
//! use http::{Method, Uri};
//! use shelf_offline::{FetchStrategy, OfflinePolicy};
//!
//! let policy = OfflinePolicy::new("https://shop.example.com")
//!     .unwrap()
//!     .with_backend_host("api.example.com")
//!     .with_core_asset("/index.html");
//!
//! let uri: Uri = "https://shop.example.com/index.html".parse().unwrap();
//! assert_eq!(policy.strategy_for(&Method::GET, &uri), FetchStrategy::CacheFirst);
//! ```

mod error;
mod policy;
mod store;
mod worker;

pub use error::{OfflineError, OfflineResult};
pub use policy::{FetchStrategy, OfflinePolicy, DEFAULT_CACHE_VERSION};
pub use store::{CacheStorage, CachedResponse, MemoryCacheStorage};
pub use worker::{Fetcher, OfflineCache, ResponseSource, Served};
