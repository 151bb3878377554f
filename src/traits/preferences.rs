//! Key/value preference persistence trait.

use async_trait::async_trait;

use crate::error::PreferenceError;

/// Logical keys used by the app. The backing format is up to the adapter.
pub mod keys {
    /// Theme flag, stored as `"dark"` or `"light"`.
    pub const THEME: &str = "theme";
    /// Display name string.
    pub const USERNAME: &str = "username";
    /// RFC 3339 timestamp of the last display-name change.
    pub const NAME_LAST_CHANGED: &str = "name_last_changed";
    /// Recently viewed story titles, stored as a JSON array of strings.
    pub const RECENT_STORIES: &str = "recent_stories";
}

/// Asynchronous key/value persistence.
///
/// Writes are fire-and-forget from the coordinators' point of view: callers
/// update in-memory state first and issue the write in a background task,
/// logging (never propagating) a failure.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read a stored value. `Ok(None)` means the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}
