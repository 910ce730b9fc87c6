//! Theme persistence: key-value storage, load/save/reset, export and import
//!
//! Normalization always happens on read. Writes store the configuration
//! verbatim, so a stored document may be partial or legacy-shaped and still
//! load correctly later.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

use crate::config::{ThemeConfig, normalize};
use crate::constants;
use crate::error::ImportError;

/// Synchronous string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same entries, so a test can keep one
/// handle while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform config directory
    pub fn open_default() -> Self {
        let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push(constants::config::APP_DIR);
        Self::new(dir)
    }

    /// Store scoped to the login session: the runtime directory is cleared
    /// at logout. Falls back to the temp directory where there is none.
    pub fn open_session() -> Self {
        let mut dir = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
        dir.push(constants::config::APP_DIR);
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{key}.{}", constants::config::STORE_EXTENSION))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create store directory {}", self.dir.display())
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

/// Pretty-printed JSON export of a configuration
pub fn export_json(config: &ThemeConfig) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to serialize theme to JSON")
}

/// Write the export document into `dir` under the fixed download filename
pub fn export_to_file(config: &ThemeConfig, dir: &Path) -> Result<PathBuf> {
    let json = export_json(config)?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(constants::export::FILENAME);
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Exported theme");
    Ok(path)
}

/// Parse an import document and normalize it against `baseline`
pub fn import_str(text: &str, baseline: &ThemeConfig) -> Result<ThemeConfig, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(normalize(&value, baseline))
}

/// Read an import file and normalize it against `baseline`
pub async fn import_file(path: &Path, baseline: &ThemeConfig) -> Result<ThemeConfig, ImportError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let theme = import_str(&text, baseline)?;
    info!(path = %path.display(), "Imported theme");
    Ok(theme)
}

/// Theme persistence over a key-value store
pub struct ThemeStore<S> {
    store: S,
    baseline: ThemeConfig,
}

impl<S: KeyValueStore> ThemeStore<S> {
    pub fn new(store: S, baseline: ThemeConfig) -> Self {
        Self { store, baseline }
    }

    /// Store using the compiled-in baseline
    pub fn with_default_baseline(store: S) -> Self {
        Self::new(store, ThemeConfig::default())
    }

    pub fn baseline(&self) -> &ThemeConfig {
        &self.baseline
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored theme. Never fails: missing or unreadable data
    /// falls back to the baseline.
    pub fn load(&self) -> ThemeConfig {
        let raw = match self.store.get(constants::storage::THEME_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored theme, using baseline");
                return self.baseline.clone();
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read stored theme, using baseline");
                return self.baseline.clone();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => normalize(&value, &self.baseline),
            Err(e) => {
                warn!(key = constants::storage::THEME_KEY, error = %e, "Stored theme is not valid JSON, using baseline");
                self.baseline.clone()
            }
        }
    }

    /// Persist the configuration verbatim. Write failures are logged.
    pub fn save(&mut self, config: &ThemeConfig) {
        let result = serde_json::to_string(config)
            .context("Failed to serialize theme")
            .and_then(|json| self.store.set(constants::storage::THEME_KEY, &json));
        if let Err(e) = result {
            error!(error = ?e, "Failed to save theme");
        }
    }

    /// Delete the stored theme; the next `load` returns the baseline
    pub fn reset(&mut self) {
        match self.store.remove(constants::storage::THEME_KEY) {
            Ok(()) => info!("Theme reset to defaults"),
            Err(e) => error!(error = ?e, "Failed to reset theme"),
        }
    }

    /// Parse and normalize an import document
    pub fn import_from_str(&self, text: &str) -> Result<ThemeConfig, ImportError> {
        import_str(text, &self.baseline)
    }

    /// Read, parse and normalize an import file
    pub async fn import_from_file(&self, path: &Path) -> Result<ThemeConfig, ImportError> {
        import_file(path, &self.baseline).await
    }

    /// Editor auto-apply toggle (defaults to on)
    pub fn auto_apply(&self) -> bool {
        match self.store.get(constants::storage::AUTO_APPLY_KEY) {
            Ok(Some(raw)) => raw.trim() == "true",
            Ok(None) => true,
            Err(e) => {
                warn!(error = ?e, "Failed to read auto-apply setting, assuming on");
                true
            }
        }
    }

    pub fn set_auto_apply(&mut self, enabled: bool) {
        let value = if enabled { "true" } else { "false" };
        if let Err(e) = self.store.set(constants::storage::AUTO_APPLY_KEY, value) {
            error!(error = ?e, "Failed to save auto-apply setting");
        }
    }
}
