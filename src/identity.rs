//! Anonymous per-installation device identifier.
//!
//! The identifier is a random UUID created on first use and cached in a small
//! key-value store. An empty identifier means "identity not available": reads
//! return nothing and commits are refused.

use crate::config::Config;
use crate::errors::AppResult;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

pub const DEVICE_ID_KEY: &str = "timer_device_id";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
}

/// JSON object file, e.g. `{ "timer_device_id": "..." }`.
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> AppResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Return the cached device id, creating and storing one on first call.
/// Without a store the result is the empty string.
pub fn get_or_create_device_id(store: Option<&mut dyn KeyValueStore>) -> AppResult<String> {
    let Some(store) = store else {
        return Ok(String::new());
    };

    if let Some(id) = store.get(DEVICE_ID_KEY)?
        && !id.is_empty()
    {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    store.set(DEVICE_ID_KEY, &id)?;
    Ok(id)
}

/// Device id for the configured identity file.
pub fn resolve_device_id(cfg: &Config) -> AppResult<String> {
    match cfg.identity_path() {
        Some(path) => {
            let mut store = FileKeyValueStore::new(path);
            get_or_create_device_id(Some(&mut store))
        }
        None => get_or_create_device_id(None),
    }
}
