//! Process-wide key/value settings store
//!
//! One flat JSON object on disk, typed access in memory. Absence of a key is
//! never an error: `get` falls back to the caller's default and records it,
//! so the persisted file accumulates every key the application ever asked
//! for.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
pub struct Settings {
    values: RwLock<Map<String, Value>>,
    save_path: RwLock<Option<PathBuf>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load persisted values, replacing anything held in memory.
    /// A missing file is not an error; the store keeps its defaults.
    pub fn load(&self, path: &Path) -> Result<()> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let parsed: Map<String, Value> = serde_json::from_str(&content)?;
        *self.write() = parsed;
        Ok(())
    }

    pub fn set_save_path(&self, path: impl Into<PathBuf>) {
        *self
            .save_path
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(path.into());
    }

    pub fn save(&self) -> Result<()> {
        let path = self
            .save_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| Error::settings("no save path configured"))?;
        let body = serde_json::to_string_pretty(&*self.read())?;
        std::fs::write(&path, body)?;
        Ok(())
    }

    /// Typed read with a default. An absent key returns the default and
    /// records it; a value of the wrong shape returns the default without
    /// overwriting what is stored.
    pub fn get<T>(&self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let mut values = self.write();
        match values.get(key).cloned() {
            Some(value) => serde_json::from_value(value).unwrap_or(default),
            None => {
                if let Ok(value) = serde_json::to_value(&default) {
                    values.insert(key.to_string(), value);
                }
                default
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: T) {
        if let Ok(value) = serde_json::to_value(&value) {
            self.write().insert(key.to_string(), value);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}
