//! Theme preference coordination.
//!
//! One boolean (`true` = dark) with persisted backing. The coordinator is
//! the single writer; everyone else reads the latest value through a watch
//! receiver, so every update is one atomic snapshot swap and readers never
//! observe a torn state. Persistence writes are fire-and-forget: the
//! in-memory value is visible synchronously, a failed write is logged and
//! the app keeps running.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::PreferenceError;
use crate::traits::{keys, PreferenceStore};

/// Stored value for the dark theme.
const DARK: &str = "dark";
/// Stored value for the light theme.
const LIGHT: &str = "light";

struct ThemeInner {
    store: Arc<dyn PreferenceStore>,
    tx: watch::Sender<bool>,
}

/// Single-writer coordinator for the theme flag.
///
/// Cheap to clone; all clones share the same published value.
#[derive(Clone)]
pub struct ThemeCoordinator {
    inner: Arc<ThemeInner>,
}

impl ThemeCoordinator {
    /// Create a coordinator starting at the default (light) theme.
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            inner: Arc::new(ThemeInner { store, tx }),
        }
    }

    /// Read the persisted preference once at startup.
    ///
    /// An absent value leaves the default (light). Errors propagate so the
    /// bootstrap sequencer can log them, but they never gate startup.
    pub async fn load(&self) -> Result<(), PreferenceError> {
        let stored = self.inner.store.get(keys::THEME).await?;
        let dark = stored.as_deref() == Some(DARK);
        self.inner.tx.send_if_modified(|current| {
            if *current != dark {
                *current = dark;
                true
            } else {
                false
            }
        });
        Ok(())
    }

    /// Latest in-memory value.
    pub fn is_dark(&self) -> bool {
        *self.inner.tx.borrow()
    }

    /// Subscribe to theme changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.tx.subscribe()
    }

    /// Update the theme. The in-memory value changes synchronously; the
    /// persistence write runs in the background.
    pub fn set(&self, dark: bool) {
        let changed = self.inner.tx.send_if_modified(|current| {
            if *current != dark {
                *current = dark;
                true
            } else {
                false
            }
        });
        if !changed {
            return;
        }
        let store = Arc::clone(&self.inner.store);
        tokio::spawn(async move {
            let value = if dark { DARK } else { LIGHT };
            if let Err(err) = store.set(keys::THEME, value).await {
                tracing::warn!(%err, "failed to persist theme preference");
            }
        });
    }

    /// Flip the theme and return the new value.
    pub fn toggle(&self) -> bool {
        let next = !self.is_dark();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockPreferences;

    #[tokio::test]
    async fn test_defaults_to_light_when_unset() {
        let store = Arc::new(MockPreferences::new());
        let theme = ThemeCoordinator::new(store);
        theme.load().await.unwrap();
        assert!(!theme.is_dark());
    }

    #[tokio::test]
    async fn test_load_reads_persisted_dark() {
        let store = Arc::new(MockPreferences::new());
        store.preload(keys::THEME, DARK);
        let theme = ThemeCoordinator::new(store);
        theme.load().await.unwrap();
        assert!(theme.is_dark());
    }

    #[tokio::test]
    async fn test_toggle_is_synchronously_visible() {
        let store = Arc::new(MockPreferences::new());
        let theme = ThemeCoordinator::new(store);
        assert!(theme.toggle());
        // No await between toggle and read: in-memory update must not wait
        // for the persistence write.
        assert!(theme.is_dark());
        assert!(!theme.toggle());
        assert!(!theme.is_dark());
    }

    #[tokio::test]
    async fn test_toggle_persists_across_restart() {
        let store = Arc::new(MockPreferences::new());
        let theme = ThemeCoordinator::new(Arc::clone(&store) as Arc<dyn PreferenceStore>);
        theme.load().await.unwrap();
        theme.toggle();
        store.flush().await;

        // Simulated restart: a fresh coordinator over the same store.
        let theme = ThemeCoordinator::new(store);
        theme.load().await.unwrap();
        assert!(theme.is_dark());
    }

    #[tokio::test]
    async fn test_redundant_set_publishes_nothing() {
        let store = Arc::new(MockPreferences::new());
        let theme = ThemeCoordinator::new(store);
        let mut rx = theme.subscribe();
        theme.set(false);
        theme.set(false);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_set_survives_persistence_failure() {
        let store = Arc::new(MockPreferences::new());
        store.fail_writes("disk full");
        let theme = ThemeCoordinator::new(Arc::clone(&store) as Arc<dyn PreferenceStore>);
        theme.set(true);
        assert!(theme.is_dark());
        store.flush().await;
        assert!(theme.is_dark());
    }
}
