//! CLI configuration.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shelf_commerce::currency::{CurrencyEntry, CurrencyTable};
use shelf_commerce::settings::{
    StorefrontSettings, DEFAULT_MAX_LINE_ITEMS, DEFAULT_MAX_QUANTITY_PER_ITEM,
    DEFAULT_NOTIFICATION_TTL_SECS,
};
use shelf_offline::{OfflinePolicy, DEFAULT_CACHE_VERSION};

/// Config file names searched for, nearest directory first.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["shelf.toml", ".shelf.toml"];

/// `shelf.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShelfConfig {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cart limits.
    #[serde(default)]
    pub cart: CartConfig,

    /// Notification settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Checkout configuration.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Offline caching configuration.
    #[serde(default)]
    pub offline: OfflineConfig,

    /// Replaces the built-in currency table when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub currencies: Vec<CurrencyEntry>,
}

impl ShelfConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Storefront settings derived from this config.
    pub fn settings(&self) -> StorefrontSettings {
        StorefrontSettings {
            max_line_items: self.cart.max_line_items,
            max_quantity_per_item: self.cart.max_quantity_per_item,
            notification_ttl_secs: self.notifications.ttl_secs,
        }
    }

    /// The configured currency table, or the built-in one.
    pub fn currency_table(&self) -> Result<Arc<CurrencyTable>> {
        if self.currencies.is_empty() {
            return Ok(CurrencyTable::builtin());
        }
        let table = CurrencyTable::new(self.currencies.clone())
            .context("Invalid [[currencies]] table")?;
        Ok(Arc::new(table))
    }

    /// The offline policy, if an origin is configured.
    pub fn offline_policy(&self) -> Result<Option<OfflinePolicy>> {
        let Some(origin) = self.offline.origin.as_deref() else {
            return Ok(None);
        };

        let mut policy = OfflinePolicy::new(origin)
            .with_context(|| format!("Invalid offline.origin: {}", origin))?
            .with_cache_version(self.offline.cache_version.clone());
        if let Some(host) = &self.offline.backend_host {
            policy = policy.with_backend_host(host.clone());
        }
        for asset in &self.offline.core_assets {
            policy = policy.with_core_asset(asset.clone());
        }
        Ok(Some(policy))
    }
}

/// Where cart and currency state is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage directory, relative to the config file.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    ".shelf".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Cart limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    /// Maximum distinct line items.
    #[serde(default = "default_max_line_items")]
    pub max_line_items: usize,

    /// Maximum quantity of one line.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: u32,
}

fn default_max_line_items() -> usize {
    DEFAULT_MAX_LINE_ITEMS
}

fn default_max_quantity() -> u32 {
    DEFAULT_MAX_QUANTITY_PER_ITEM
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            max_line_items: default_max_line_items(),
            max_quantity_per_item: default_max_quantity(),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Seconds a notification stays visible.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_NOTIFICATION_TTL_SECS
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Checkout configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Hosted checkout page. Checkout is unavailable without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_url: Option<String>,
}

/// Offline caching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConfig {
    /// Storefront origin, e.g. `https://shop.example.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// API host whose requests are never cached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_host: Option<String>,

    /// Paths precached at install.
    #[serde(default)]
    pub core_assets: Vec<String>,

    /// Cache generation.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,
}

fn default_cache_version() -> String {
    DEFAULT_CACHE_VERSION.to_string()
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            origin: None,
            backend_host: None,
            core_assets: Vec::new(),
            cache_version: default_cache_version(),
        }
    }
}

/// Generate a default shelf.toml.
pub fn generate_default_config() -> String {
    format!(
        r#"# Shelf storefront configuration

[storage]
dir = ".shelf"

[cart]
max_line_items = {max_lines}
max_quantity_per_item = {max_qty}

[notifications]
ttl_secs = {ttl}

[checkout]
# hosted_url = "https://pay.example.com/checkout"

[offline]
# origin = "https://shop.example.com"
# backend_host = "api.example.com"
core_assets = ["/", "/index.html", "/css/styles.css", "/js/cart.js", "/js/currency.js"]
cache_version = "{version}"

# Replace the built-in currency table:
# [[currencies]]
# code = "USD"
# symbol = "$"
# display_name = "US Dollar"
# rate = 1.0
"#,
        max_lines = DEFAULT_MAX_LINE_ITEMS,
        max_qty = DEFAULT_MAX_QUANTITY_PER_ITEM,
        ttl = DEFAULT_NOTIFICATION_TTL_SECS,
        version = DEFAULT_CACHE_VERSION,
    )
}
