// Theme and profile round trips through the file-backed preference store,
// including the name-change cooldown judged from a persisted timestamp.

use std::sync::Arc;

use chrono::{Duration, Utc};
use haven::adapters::JsonFilePreferences;
use haven::error::ProfileError;
use haven::profile::{ProfileCoordinator, NAME_CHANGE_COOLDOWN_DAYS};
use haven::theme::ThemeCoordinator;
use haven::traits::{keys, PreferenceStore};

fn file_store(dir: &tempfile::TempDir) -> Arc<dyn PreferenceStore> {
    Arc::new(JsonFilePreferences::new(dir.path().join("prefs.json")))
}

async fn drain_writes() {
    // Fire-and-forget persistence awaits real file IO on spawned tasks.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_theme_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let theme = ThemeCoordinator::new(file_store(&dir));
    theme.load().await.unwrap();
    theme.set(true);
    drain_writes().await;

    let theme = ThemeCoordinator::new(file_store(&dir));
    theme.load().await.unwrap();
    assert!(theme.is_dark());
}

#[tokio::test]
async fn test_profile_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let profile = ProfileCoordinator::new(file_store(&dir));
    profile.load().await.unwrap();
    profile.set_display_name("Ada").unwrap();
    profile.record_viewed("Story A0");
    profile.record_viewed("Story B1");
    drain_writes().await;

    let profile = ProfileCoordinator::new(file_store(&dir));
    profile.load().await.unwrap();
    let snapshot = profile.snapshot();
    assert_eq!(snapshot.display_name.as_deref(), Some("Ada"));
    assert!(snapshot.name_last_changed.is_some());
    assert_eq!(snapshot.recent_stories, vec!["Story B1", "Story A0"]);
}

#[tokio::test]
async fn test_cooldown_enforced_from_persisted_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    let recent = (Utc::now() - Duration::days(5)).to_rfc3339();
    store.set(keys::USERNAME, "Ada").await.unwrap();
    store.set(keys::NAME_LAST_CHANGED, &recent).await.unwrap();

    let profile = ProfileCoordinator::new(store);
    profile.load().await.unwrap();
    match profile.set_display_name("Grace").unwrap_err() {
        ProfileError::NameChangeCooldown {
            cooldown_days,
            remaining_days,
        } => {
            assert_eq!(cooldown_days, NAME_CHANGE_COOLDOWN_DAYS);
            assert!(remaining_days > 0 && remaining_days <= 25);
        }
    }
    assert_eq!(profile.snapshot().display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_cooldown_expired_timestamp_allows_change() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    let old = (Utc::now() - Duration::days(NAME_CHANGE_COOLDOWN_DAYS + 1)).to_rfc3339();
    store.set(keys::USERNAME, "Ada").await.unwrap();
    store.set(keys::NAME_LAST_CHANGED, &old).await.unwrap();

    let profile = ProfileCoordinator::new(store);
    profile.load().await.unwrap();
    profile.set_display_name("Grace").unwrap();
    assert_eq!(profile.snapshot().display_name.as_deref(), Some("Grace"));
}

#[tokio::test]
async fn test_malformed_timestamp_is_ignored_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    store.set(keys::NAME_LAST_CHANGED, "last tuesday").await.unwrap();

    let profile = ProfileCoordinator::new(store);
    profile.load().await.unwrap();
    assert!(profile.snapshot().name_last_changed.is_none());
    // With no usable timestamp the change is allowed.
    profile.set_display_name("Ada").unwrap();
}
