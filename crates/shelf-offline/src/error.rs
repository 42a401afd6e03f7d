//! Offline cache errors.

/// Result type for offline cache operations.
pub type OfflineResult<T> = Result<T, OfflineError>;

/// Errors raised while precaching or serving requests.
#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    /// The network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// A precache fetch returned a non-success status.
    #[error("unexpected status {status} for {uri}")]
    BadStatus { uri: String, status: u16 },

    /// Network failed and no cached copy exists.
    #[error("offline and not cached: {0}")]
    NotCached(String),

    /// Backend storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// The configured origin is not an absolute URL.
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),

    /// A request or URI could not be built.
    #[error("http error: {0}")]
    Http(#[from] http::Error),
}
