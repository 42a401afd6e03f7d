//! Install, activate and fetch handling for the offline cache.

use async_trait::async_trait;
use http::{Method, Request, Response};
use serde::Serialize;

use crate::error::{OfflineError, OfflineResult};
use crate::policy::{FetchStrategy, OfflinePolicy};
use crate::store::{CacheStorage, CachedResponse};

/// Network access.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform `request` against the network.
    async fn fetch(&self, request: &Request<Vec<u8>>) -> OfflineResult<Response<Vec<u8>>>;
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Network,
    Cache,
}

/// A response together with how it was obtained.
#[derive(Debug)]
pub struct Served {
    pub response: Response<Vec<u8>>,
    pub source: ResponseSource,
    pub strategy: FetchStrategy,
}

/// Offline cache for one storefront origin.
pub struct OfflineCache<F: Fetcher, S: CacheStorage> {
    policy: OfflinePolicy,
    fetcher: F,
    storage: S,
}

impl<F: Fetcher, S: CacheStorage> OfflineCache<F, S> {
    /// Create a cache applying `policy`.
    pub fn new(policy: OfflinePolicy, fetcher: F, storage: S) -> Self {
        Self {
            policy,
            fetcher,
            storage,
        }
    }

    /// The policy in use.
    pub fn policy(&self) -> &OfflinePolicy {
        &self.policy
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Precache every core asset into the current generation.
    ///
    /// All or nothing: every asset is fetched before any is stored, so a
    /// failed fetch leaves the generation untouched.
    pub async fn install(&self) -> OfflineResult<usize> {
        let cache = self.policy.cache_name();
        let mut fetched = Vec::with_capacity(self.policy.core_assets.len());
        for path in &self.policy.core_assets {
            let request = Request::get(self.policy.resolve(path)?).body(Vec::new())?;
            let response = self.fetcher.fetch(&request).await?;
            if !response.status().is_success() {
                return Err(OfflineError::BadStatus {
                    uri: request.uri().to_string(),
                    status: response.status().as_u16(),
                });
            }
            fetched.push((path, CachedResponse::from_response(&response)));
        }

        for (path, response) in fetched {
            self.storage.put(&cache, path, response).await?;
        }

        tracing::info!(cache = %cache, assets = self.policy.core_assets.len(), "precached core assets");
        Ok(self.policy.core_assets.len())
    }

    /// Delete caches of every other generation. Returns the deleted names.
    pub async fn activate(&self) -> OfflineResult<Vec<String>> {
        let current = self.policy.cache_name();
        let mut deleted = Vec::new();
        for name in self.storage.cache_names().await? {
            if name != current && self.storage.delete_cache(&name).await? {
                tracing::debug!(cache = %name, "deleted stale cache");
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    /// Serve `request` according to the policy.
    pub async fn handle(&self, request: &Request<Vec<u8>>) -> OfflineResult<Served> {
        let strategy = self.policy.strategy_for(request.method(), request.uri());
        tracing::trace!(uri = %request.uri(), %strategy, "fetch");

        match strategy {
            FetchStrategy::Passthrough => {
                let response = self.fetcher.fetch(request).await?;
                Ok(served(response, ResponseSource::Network, strategy))
            }
            FetchStrategy::CacheFirst => {
                if let Some(cached) = self.lookup(request).await {
                    return Ok(served(cached.to_response()?, ResponseSource::Cache, strategy));
                }
                let response = self.fetcher.fetch(request).await?;
                self.store(request, &response).await;
                Ok(served(response, ResponseSource::Network, strategy))
            }
            FetchStrategy::NetworkFirst => match self.fetcher.fetch(request).await {
                Ok(response) => {
                    self.store(request, &response).await;
                    Ok(served(response, ResponseSource::Network, strategy))
                }
                Err(e) => {
                    tracing::debug!(uri = %request.uri(), error = %e, "network failed, trying cache");
                    match self.lookup(request).await {
                        Some(cached) => {
                            Ok(served(cached.to_response()?, ResponseSource::Cache, strategy))
                        }
                        None => Err(OfflineError::NotCached(request.uri().path().to_string())),
                    }
                }
            },
        }
    }

    async fn lookup(&self, request: &Request<Vec<u8>>) -> Option<CachedResponse> {
        match self
            .storage
            .lookup(&self.policy.cache_name(), &cache_key(request))
            .await
        {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "cache lookup failed");
                None
            }
        }
    }

    async fn store(&self, request: &Request<Vec<u8>>, response: &Response<Vec<u8>>) {
        if !response.status().is_success() || *request.method() != Method::GET {
            return;
        }
        let key = cache_key(request);
        if let Err(e) = self
            .storage
            .put(&self.policy.cache_name(), &key, CachedResponse::from_response(response))
            .await
        {
            tracing::warn!(key = %key, error = %e, "failed to cache response");
        }
    }
}

fn served(response: Response<Vec<u8>>, source: ResponseSource, strategy: FetchStrategy) -> Served {
    Served {
        response,
        source,
        strategy,
    }
}

/// Same-origin requests are keyed by path and query.
fn cache_key(request: &Request<Vec<u8>>) -> String {
    request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string())
}
