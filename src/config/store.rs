//! Key/value preference store backed by a JSON object file
//!
//! Reads fall back to the caller's default. Every write flushes the whole
//! document; a failed flush is logged and the in-memory value is kept.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct JsonStore {
    path: Option<PathBuf>,
    values: Map<String, Value>,
}

impl JsonStore {
    /// Default location: `<config_dir>/net-floater/config.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Open the store at `path`. A missing, unreadable or malformed file
    /// gives an empty store; the file is only rewritten on the next `set`.
    pub fn open(path: PathBuf) -> Self {
        let values = match read_document(&path) {
            Ok(Some(values)) => {
                info!(path = %path.display(), keys = values.len(), "Loaded preferences");
                values
            }
            Ok(None) => {
                info!(path = %path.display(), "No preferences file, using defaults");
                Map::new()
            }
            Err(e) => {
                error!(path = %path.display(), error = ?e, "Failed to load preferences, using defaults");
                Map::new()
            }
        };
        Self { path: Some(path), values }
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self { path: None, values: Map::new() }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            None => default,
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                warn!(key = key, error = %e, "Ignoring malformed preference value");
                default
            }),
        }
    }

    /// Update one key and flush. Fire-and-forget: failures are logged only.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.values.insert(key.to_string(), value);
            }
            Err(e) => {
                error!(key = key, error = %e, "Failed to serialize preference");
                return;
            }
        }

        if let Err(e) = self.flush() {
            error!(key = key, error = ?e, "Failed to save preferences");
        }
    }

    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&self.values)
            .context("Failed to serialize preferences to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write preferences to {:?}", path))?;
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<Option<Map<String, Value>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preferences from {:?}", path))?;
    let values = serde_json::from_str::<Map<String, Value>>(&contents)
        .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("net-floater-test-{}-{}", std::process::id(), name));
        path.push("config.json");
        let _ = fs::remove_dir_all(path.parent().unwrap());
        path
    }

    #[test]
    fn test_get_missing_returns_default() {
        let store = JsonStore::in_memory();
        assert!(!store.get("show_percentage", false));
        assert_eq!(store.get::<Option<i32>>("window_position", None), None);
    }

    #[test]
    fn test_set_then_get() {
        let mut store = JsonStore::in_memory();
        store.set("compact_mode", true);
        assert!(store.get("compact_mode", false));
    }

    #[test]
    fn test_malformed_value_falls_back() {
        let mut store = JsonStore::in_memory();
        store.set("compact_mode", "yes please");
        assert!(!store.get("compact_mode", false));
    }

    #[test]
    fn test_set_persists_and_reopens() {
        let path = scratch_path("reopen");
        let mut store = JsonStore::open(path.clone());
        store.set("auto_start", true);
        store.set("unknown_key", 42);

        let reopened = JsonStore::open(path.clone());
        assert!(reopened.get("auto_start", false));
        assert_eq!(reopened.get("unknown_key", 0), 42);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = JsonStore::open(path.clone());
        assert!(!store.get("show_percentage", false));
        // The broken file is left alone until the next write
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
