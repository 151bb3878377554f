//! User profile coordination: display name and recently-viewed stories.
//!
//! Same publication discipline as the theme: single writer, immutable
//! [`ProfileSnapshot`] values on a watch channel, fire-and-forget
//! persistence writes. The one domain rule lives here too: the display name
//! can change at most once every 30 days.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::error::{PreferenceError, ProfileError};
use crate::traits::{keys, PreferenceStore};

/// Days that must pass between display-name changes.
pub const NAME_CHANGE_COOLDOWN_DAYS: i64 = 30;

/// Maximum entries kept in the recently-viewed list.
pub const RECENT_STORIES_LIMIT: usize = 10;

/// Immutable view of the profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSnapshot {
    /// Display name, if one was ever set.
    pub display_name: Option<String>,
    /// When the display name last changed.
    pub name_last_changed: Option<DateTime<Utc>>,
    /// Recently viewed story titles, most recent first, bounded.
    pub recent_stories: Vec<String>,
}

struct ProfileInner {
    store: Arc<dyn PreferenceStore>,
    tx: watch::Sender<ProfileSnapshot>,
}

/// Single-writer coordinator for profile data.
#[derive(Clone)]
pub struct ProfileCoordinator {
    inner: Arc<ProfileInner>,
}

impl ProfileCoordinator {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let (tx, _rx) = watch::channel(ProfileSnapshot::default());
        Self {
            inner: Arc::new(ProfileInner { store, tx }),
        }
    }

    /// Read all persisted profile keys once at startup. Each key falls back
    /// to its default independently; a malformed value is logged and
    /// ignored rather than failing the load.
    pub async fn load(&self) -> Result<(), PreferenceError> {
        let store = &self.inner.store;
        let display_name = store.get(keys::USERNAME).await?;
        let name_last_changed = match store.get(keys::NAME_LAST_CHANGED).await? {
            Some(raw) => match DateTime::parse_from_rfc3339(&raw) {
                Ok(ts) => Some(ts.with_timezone(&Utc)),
                Err(err) => {
                    tracing::warn!(%err, "ignoring malformed name-change timestamp");
                    None
                }
            },
            None => None,
        };
        let recent_stories = match store.get(keys::RECENT_STORIES).await? {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(titles) => titles,
                Err(err) => {
                    tracing::warn!(%err, "ignoring malformed recently-viewed list");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        self.inner.tx.send_replace(ProfileSnapshot {
            display_name,
            name_last_changed,
            recent_stories,
        });
        Ok(())
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> ProfileSnapshot {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to profile changes.
    pub fn subscribe(&self) -> watch::Receiver<ProfileSnapshot> {
        self.inner.tx.subscribe()
    }

    /// Change the display name, enforcing the 30-day cooldown.
    pub fn set_display_name(&self, name: &str) -> Result<(), ProfileError> {
        self.set_display_name_at(name, Utc::now())
    }

    fn set_display_name_at(&self, name: &str, now: DateTime<Utc>) -> Result<(), ProfileError> {
        if let Some(changed) = self.inner.tx.borrow().name_last_changed {
            let elapsed = now - changed;
            if elapsed < Duration::days(NAME_CHANGE_COOLDOWN_DAYS) {
                let remaining = NAME_CHANGE_COOLDOWN_DAYS - elapsed.num_days();
                return Err(ProfileError::NameChangeCooldown {
                    cooldown_days: NAME_CHANGE_COOLDOWN_DAYS,
                    remaining_days: remaining,
                });
            }
        }

        self.inner.tx.send_modify(|snapshot| {
            snapshot.display_name = Some(name.to_string());
            snapshot.name_last_changed = Some(now);
        });

        let store = Arc::clone(&self.inner.store);
        let name = name.to_string();
        tokio::spawn(async move {
            if let Err(err) = store.set(keys::USERNAME, &name).await {
                tracing::warn!(%err, "failed to persist display name");
            }
            if let Err(err) = store.set(keys::NAME_LAST_CHANGED, &now.to_rfc3339()).await {
                tracing::warn!(%err, "failed to persist name-change timestamp");
            }
        });
        Ok(())
    }

    /// Record a story as viewed: moved (or inserted) at the front,
    /// de-duplicated, bounded at [`RECENT_STORIES_LIMIT`].
    pub fn record_viewed(&self, title: &str) {
        let mut persisted = Vec::new();
        self.inner.tx.send_modify(|snapshot| {
            snapshot.recent_stories.retain(|t| t != title);
            snapshot.recent_stories.insert(0, title.to_string());
            snapshot.recent_stories.truncate(RECENT_STORIES_LIMIT);
            persisted = snapshot.recent_stories.clone();
        });

        let store = Arc::clone(&self.inner.store);
        tokio::spawn(async move {
            let json = match serde_json::to_string(&persisted) {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(%err, "failed to encode recently-viewed list");
                    return;
                }
            };
            if let Err(err) = store.set(keys::RECENT_STORIES, &json).await {
                tracing::warn!(%err, "failed to persist recently-viewed list");
            }
        });
    }
}
