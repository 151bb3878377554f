//! In-memory preference store with failure injection.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::PreferenceError;
use crate::traits::PreferenceStore;

/// In-memory [`PreferenceStore`] for tests.
///
/// Values survive for the life of the instance, so a "restart" is simulated
/// by building a fresh coordinator over the same store.
#[derive(Default)]
pub struct MockPreferences {
    values: Mutex<HashMap<String, String>>,
    fail_reads: Mutex<Option<String>>,
    fail_writes: Mutex<Option<String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl MockPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored value, as if persisted by an earlier run.
    pub fn preload(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Make every subsequent `get` fail with the given message.
    pub fn fail_reads(&self, message: &str) {
        *self.fail_reads.lock().unwrap() = Some(message.to_string());
    }

    /// Make every subsequent `set` fail with the given message.
    pub fn fail_writes(&self, message: &str) {
        *self.fail_writes.lock().unwrap() = Some(message.to_string());
    }

    /// All successful writes, in order.
    pub fn recorded_writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    /// Let fire-and-forget write tasks spawned by coordinators run to
    /// completion on the current-thread test runtime.
    pub async fn flush(&self) {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl PreferenceStore for MockPreferences {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        if let Some(message) = self.fail_reads.lock().unwrap().clone() {
            return Err(PreferenceError::Io(message));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        if let Some(message) = self.fail_writes.lock().unwrap().clone() {
            return Err(PreferenceError::Io(message));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_none_for_unset_key() {
        let store = MockPreferences::new();
        assert_eq!(store.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let store = MockPreferences::new();
        store.set("theme", "dark").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
        assert_eq!(store.recorded_writes().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MockPreferences::new();
        store.fail_reads("gone");
        assert!(store.get("theme").await.is_err());
        store.fail_writes("full");
        assert!(store.set("theme", "dark").await.is_err());
    }
}
