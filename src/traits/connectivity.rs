//! Network reachability trait: push subscription plus one-shot pull.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::FetchError;

/// Cancellation guard for a connectivity subscription.
///
/// Owners must call [`Subscription::cancel`] (or drop the guard) on
/// teardown; a forgotten live subscription is a resource leak. Dropping the
/// guard cancels as well, so the subscription cannot outlive its owner.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

impl Subscription {
    /// Build a guard from the closure that detaches the subscriber.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Detach the subscriber. Idempotent with Drop.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// A stream of connectivity readings plus its cancellation guard.
pub struct ConnectivityEvents {
    /// Readings, most recent last. Monitors deliver the last-known status
    /// immediately on subscribe when they have one.
    pub rx: mpsc::Receiver<bool>,
    /// Guard that detaches this subscriber from the monitor.
    pub guard: Subscription,
}

/// Push+pull network reachability signal.
#[async_trait]
pub trait ConnectivityMonitor: Send + Sync {
    /// Subscribe to connectivity changes.
    fn subscribe(&self) -> ConnectivityEvents;

    /// One-shot reachability probe, used by manual refresh actions.
    async fn fetch_once(&self) -> Result<bool, FetchError>;
}
