//! Key-value settings injected into the pipeline and the presentation layer.

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

pub const API_KEY: &str = "apiKey";
pub const HIDDEN_COLUMNS: &str = "hiddenColumns";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("settings file {path} is not valid JSON: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
}

pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// Settings kept as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, SettingsError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<Value> {
        match self.load() {
            Ok(mut all) => all.remove(key).filter(|v| !v.is_null()),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut all = self.load()?;
        all.insert(key.to_string(), value);
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(all)).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, Value>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stored API key, blank strings count as unset.
pub fn api_key(store: &dyn SettingsStore) -> Option<String> {
    match store.get(API_KEY)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

pub fn set_api_key(store: &mut dyn SettingsStore, key: &str) -> Result<(), SettingsError> {
    store.set(API_KEY, Value::String(key.trim().to_string()))
}

/// Hidden player-table columns, `None` when the user never chose any.
pub fn hidden_columns(store: &dyn SettingsStore) -> Option<BTreeSet<String>> {
    match store.get(HIDDEN_COLUMNS)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

pub fn set_hidden_columns(store: &mut dyn SettingsStore, hidden: &BTreeSet<String>) -> Result<(), SettingsError> {
    let list = hidden.iter().cloned().map(Value::String).collect();
    store.set(HIDDEN_COLUMNS, Value::Array(list))
}

pub fn clear_hidden_columns(store: &mut dyn SettingsStore) -> Result<(), SettingsError> {
    store.set(HIDDEN_COLUMNS, Value::Null)
}
