use crate::core::traits::KeyValueStore;
use crate::utils::APP_NAME;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const STORAGE_FILE: &str = "storage.json";

/// Key/value store kept as one JSON object on disk.
///
/// The whole file is rewritten on every `set`/`remove`.
pub struct JsonStorageBackend {
    file_path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonStorageBackend {
    /// Opens the store in the default config directory.
    pub fn new() -> Result<Self> {
        Self::open_in(&default_storage_dir()?)
    }

    /// Opens (or creates) the store inside `dir`.
    ///
    /// A corrupt file is treated as empty so a bad write never locks the user out.
    pub fn open_in(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Could not create storage directory {}", dir.display()))?;

        let file_path = dir.join(STORAGE_FILE);
        let entries = if file_path.exists() {
            let content = fs::read_to_string(&file_path)
                .with_context(|| format!("Could not read {}", file_path.display()))?;
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "storage file is corrupt, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { file_path, entries })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Could not write {}", self.file_path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for JsonStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// `<config_dir>/harmony-stream`
pub fn default_storage_dir() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("Could not find config directory")?;
    path.push(APP_NAME);
    Ok(path)
}
