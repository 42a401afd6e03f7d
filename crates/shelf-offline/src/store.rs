//! Named response caches.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use http::{HeaderName, HeaderValue, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{OfflineError, OfflineResult};

/// A stored response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    /// Copy a response for storage. Non-UTF-8 header values are dropped.
    pub fn from_response(response: &Response<Vec<u8>>) -> Self {
        Self {
            status: response.status().as_u16(),
            headers: response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect(),
            body: response.body().clone(),
        }
    }

    /// Rebuild an `http` response.
    pub fn to_response(&self) -> OfflineResult<Response<Vec<u8>>> {
        let mut builder = Response::builder().status(
            StatusCode::from_u16(self.status).map_err(|e| OfflineError::Http(e.into()))?,
        );
        for (name, value) in &self.headers {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| OfflineError::Http(e.into()))?;
            let value = HeaderValue::try_from(value.as_str()).map_err(|e| OfflineError::Http(e.into()))?;
            builder = builder.header(name, value);
        }
        Ok(builder.body(self.body.clone())?)
    }
}

/// Storage for named caches of responses keyed by request path.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Look up `key` in `cache`.
    async fn lookup(&self, cache: &str, key: &str) -> OfflineResult<Option<CachedResponse>>;

    /// Store `response` under `key` in `cache`, creating the cache if needed.
    async fn put(&self, cache: &str, key: &str, response: CachedResponse) -> OfflineResult<()>;

    /// Names of all caches.
    async fn cache_names(&self) -> OfflineResult<Vec<String>>;

    /// Delete a whole cache.
    async fn delete_cache(&self, cache: &str) -> OfflineResult<bool>;
}

/// In-memory cache storage.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: Mutex<BTreeMap<String, BTreeMap<String, CachedResponse>>>,
}

impl MemoryCacheStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_caches<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, BTreeMap<String, CachedResponse>>) -> T,
    ) -> OfflineResult<T> {
        let mut caches = self
            .caches
            .lock()
            .map_err(|_| OfflineError::Storage("cache storage poisoned".to_string()))?;
        Ok(f(&mut caches))
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn lookup(&self, cache: &str, key: &str) -> OfflineResult<Option<CachedResponse>> {
        self.with_caches(|caches| caches.get(cache).and_then(|c| c.get(key)).cloned())
    }

    async fn put(&self, cache: &str, key: &str, response: CachedResponse) -> OfflineResult<()> {
        self.with_caches(|caches| {
            caches
                .entry(cache.to_string())
                .or_default()
                .insert(key.to_string(), response);
        })
    }

    async fn cache_names(&self) -> OfflineResult<Vec<String>> {
        self.with_caches(|caches| caches.keys().cloned().collect())
    }

    async fn delete_cache(&self, cache: &str) -> OfflineResult<bool> {
        self.with_caches(|caches| caches.remove(cache).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_copy_keeps_headers() {
        let response = Response::builder()
            .status(200)
            .header("content-type", "text/css")
            .body(b"body{}".to_vec())
            .unwrap();

        let cached = CachedResponse::from_response(&response);
        assert_eq!(cached.status, 200);
        assert_eq!(cached.headers, vec![("content-type".to_string(), "text/css".to_string())]);

        let rebuilt = cached.to_response().unwrap();
        assert_eq!(rebuilt.headers()["content-type"], "text/css");
        assert_eq!(rebuilt.body(), b"body{}");
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryCacheStorage::new();
        let page = CachedResponse {
            status: 200,
            headers: vec![],
            body: b"hi".to_vec(),
        };

        storage.put("shelf-v1", "/", page.clone()).await.unwrap();
        assert_eq!(storage.lookup("shelf-v1", "/").await.unwrap(), Some(page));
        assert_eq!(storage.lookup("shelf-v2", "/").await.unwrap(), None);
        assert_eq!(storage.cache_names().await.unwrap(), vec!["shelf-v1".to_string()]);
        assert!(storage.delete_cache("shelf-v1").await.unwrap());
        assert!(!storage.delete_cache("shelf-v1").await.unwrap());
    }
}
