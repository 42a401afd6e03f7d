//! CLI execution context.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context as _, Result};
use shelf_cache::{Cache, FileBackend};
use shelf_commerce::notify::NotificationTray;
use shelf_commerce::Storefront;

use crate::config::{ShelfConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: ShelfConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            (ShelfConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(&cwd) {
                Some(path) => (ShelfConfig::load(&path)?, Some(path)),
                None => (ShelfConfig::default(), None),
            }
        };

        match &config_path {
            Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
            None => tracing::debug!("no shelf.toml found, using defaults"),
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding the config file, or the working directory.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Directory holding cart and currency state.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(&self.base_dir(), &self.config.storage.dir)
    }

    /// Directory holding checkout records.
    pub fn checkouts_dir(&self) -> Result<PathBuf> {
        let dir = self.storage_dir().join("checkouts");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(dir)
    }

    /// Open the storefront over file storage.
    pub fn open_storefront(&self) -> Result<(Storefront, Rc<NotificationTray>)> {
        let dir = self.storage_dir();
        let backend = FileBackend::open(&dir)
            .with_context(|| format!("Failed to open storage at {}", dir.display()))?;
        let table = self.config.currency_table()?;
        let tray = Rc::new(NotificationTray::new());

        let storefront = Storefront::open_with_table(
            Cache::new(backend),
            table,
            &self.config.settings(),
            tray.clone(),
        );
        tracing::debug!(dir = %dir.display(), "storefront opened");

        Ok((storefront, tray))
    }

    /// Print and clear pending notifications.
    pub fn flush_notifications(&self, tray: &NotificationTray) {
        for notification in tray.drain() {
            self.output.notification(&notification);
        }
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
