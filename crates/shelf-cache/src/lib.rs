//! Durable key-value storage for the Shelf storefront.
//!
//! The storefront persists its cart and currency selection after every
//! mutation. This crate provides the storage collaborator:
//!
//! - [`KvBackend`] - raw byte store (`get` / `set` / `delete`)
//! - [`MemoryBackend`] - in-process store, used in tests and as a fallback
//! - [`FileBackend`] - one JSON file per key, used by the CLI
//! - `SpinBackend` - Spin's Key-Value Store (wasm32 only)
//! - [`Cache`] - typed wrapper with automatic JSON serialization
//!
//! # Example
//!
//! ```rust
//! use shelf_cache::Cache;
//!
//! let cache = Cache::in_memory();
//! cache.set("selected_currency", &"EUR").unwrap();
//!
//! let code: Option<String> = cache.get("selected_currency").unwrap();
//! assert_eq!(code.as_deref(), Some("EUR"));
//! ```

mod error;
mod file;
mod kv;

pub use error::CacheError;
pub use file::FileBackend;
pub use kv::{Cache, KvBackend, MemoryBackend};

#[cfg(target_arch = "wasm32")]
pub use kv::SpinBackend;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileBackend, KvBackend, MemoryBackend};
}
