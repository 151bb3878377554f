//! Preference store backed by a single JSON file.
//!
//! The whole store is one flat string-to-string map, read and rewritten per
//! operation. Writers are serialized through an async mutex so concurrent
//! fire-and-forget writes cannot interleave the read-modify-write cycle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::PreferenceError;
use crate::traits::PreferenceStore;

/// File-backed [`PreferenceStore`].
pub struct JsonFilePreferences {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePreferences {
    /// Use the given file; it is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("haven").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, PreferenceError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferences {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&map)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
