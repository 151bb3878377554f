//! Error types shared across the orchestration layer.
//!
//! The taxonomy is deliberately small:
//!
//! - [`FetchError`] — transient network/remote failures. These are never
//!   retried automatically; a retry happens only on an explicit user action
//!   such as pull-to-refresh.
//! - [`PreferenceError`] — persistence failures. Non-fatal everywhere:
//!   readers fall back to defaults, writers log and move on.
//! - [`ProfileError`] — domain rules around the user profile.
//!
//! A superseded async result (one whose generation counter no longer matches
//! its controller) is *not* an error. It is discarded silently at the
//! controller boundary and never surfaces through these types.

use thiserror::Error;

/// Transient failure while talking to a remote data source.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Could not reach the remote host.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The remote answered with a non-success status.
    #[error("remote returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response arrived but could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Classify a reqwest error into the fetch taxonomy.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Connection(err.to_string())
        }
    }
}

/// Failure in the key/value preference backing store.
///
/// Always non-fatal: a failed read means defaults apply, a failed write is
/// logged by the coordinator that issued it.
#[derive(Debug, Clone, Error)]
pub enum PreferenceError {
    /// The backing store could not be read or written.
    #[error("preference storage unavailable: {0}")]
    Io(String),

    /// A stored value exists but could not be decoded.
    #[error("stored preference malformed: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for PreferenceError {
    fn from(err: std::io::Error) -> Self {
        PreferenceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PreferenceError {
    fn from(err: serde_json::Error) -> Self {
        PreferenceError::Malformed(err.to_string())
    }
}

/// Domain rule violations on the user profile.
#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    /// The display name was changed too recently.
    #[error("display name can be changed every {cooldown_days} days ({remaining_days} remaining)")]
    NameChangeCooldown {
        cooldown_days: i64,
        remaining_days: i64,
    },
}
