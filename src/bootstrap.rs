//! Startup readiness state machine.
//!
//! On start three things run concurrently: the persisted theme preference
//! load (never gating), a connectivity subscription, and the minimum
//! splash-display timer. The machine leaves [`BootstrapState::Loading`] only
//! once the timer has elapsed *and* at least one connectivity reading has
//! arrived; after that it tracks connectivity, flipping between `Ready` and
//! `Offline` on actual changes only. `Loading` is never re-entered.
//!
//! State is published as immutable values on a watch channel; the screen
//! router consumes the receiver.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::theme::ThemeCoordinator;
use crate::traits::{ConnectivityEvents, ConnectivityMonitor, Subscription};

/// Minimum time the splash experience stays up.
pub const MIN_SPLASH: Duration = Duration::from_millis(2000);

/// Application readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    /// Splash phase: timer or first connectivity reading still outstanding.
    Loading,
    /// Left the splash phase with no connectivity.
    Offline,
    /// Left the splash phase online.
    Ready,
}

/// Owner of the bootstrap state machine.
///
/// Holds the connectivity subscription guard and the driver task; both are
/// released by [`BootstrapSequencer::shutdown`] (or Drop, so teardown cannot
/// be forgotten).
pub struct BootstrapSequencer {
    rx: watch::Receiver<BootstrapState>,
    guard: Option<Subscription>,
    task: JoinHandle<()>,
}

impl BootstrapSequencer {
    /// Start the machine: kick off the theme load, subscribe to
    /// connectivity, and arm the splash timer.
    pub fn start(monitor: &dyn ConnectivityMonitor, theme: ThemeCoordinator) -> Self {
        let (tx, rx) = watch::channel(BootstrapState::Loading);
        let ConnectivityEvents { rx: events, guard } = monitor.subscribe();

        // Preference load runs alongside the splash, never gating it.
        tokio::spawn(async move {
            if let Err(err) = theme.load().await {
                tracing::warn!(%err, "theme preference load failed, defaults apply");
            }
        });

        let task = tokio::spawn(drive(tx, events));

        Self {
            rx,
            guard: Some(guard),
            task,
        }
    }

    /// Current state.
    pub fn state(&self) -> BootstrapState {
        *self.rx.borrow()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<BootstrapState> {
        self.rx.clone()
    }

    /// Tear down: detach the connectivity subscriber and stop the driver.
    pub fn shutdown(mut self) {
        if let Some(guard) = self.guard.take() {
            guard.cancel();
        }
        self.task.abort();
    }
}

impl Drop for BootstrapSequencer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Driver loop: splash phase, then connectivity tracking.
async fn drive(tx: watch::Sender<BootstrapState>, mut events: tokio::sync::mpsc::Receiver<bool>) {
    let deadline = Instant::now() + MIN_SPLASH;
    let mut timer_done = false;
    let mut last_reading: Option<bool> = None;

    // Splash phase: both the timer and a first reading are required.
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline), if !timer_done => {
                timer_done = true;
            }
            reading = events.recv() => {
                match reading {
                    Some(online) => last_reading = Some(online),
                    None => {
                        // Monitor went away before a reading arrived; the
                        // splash stays up until shutdown.
                        tracing::warn!("connectivity monitor closed during splash");
                        return;
                    }
                }
            }
        }
        if timer_done {
            if let Some(online) = last_reading {
                let state = if online {
                    BootstrapState::Ready
                } else {
                    BootstrapState::Offline
                };
                tracing::debug!(?state, "leaving splash");
                let _ = tx.send(state);
                break;
            }
        }
    }

    // Steady state: transition only on actual value changes.
    while let Some(online) = events.recv().await {
        let next = if online {
            BootstrapState::Ready
        } else {
            BootstrapState::Offline
        };
        tx.send_if_modified(|current| {
            if *current != next {
                tracing::debug!(from = ?*current, to = ?next, "connectivity change");
                *current = next;
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockPreferences, ScriptedConnectivity};
    use std::sync::Arc;

    fn theme() -> ThemeCoordinator {
        ThemeCoordinator::new(Arc::new(MockPreferences::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_alone_does_not_leave_loading() {
        let monitor = ScriptedConnectivity::new();
        let sequencer = BootstrapSequencer::start(&monitor, theme());

        tokio::time::sleep(MIN_SPLASH + Duration::from_millis(100)).await;
        assert_eq!(sequencer.state(), BootstrapState::Loading);

        monitor.push(true).await;
        let mut rx = sequencer.subscribe();
        rx.wait_for(|s| *s == BootstrapState::Ready).await.unwrap();
        sequencer.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reading_alone_does_not_leave_loading() {
        let monitor = ScriptedConnectivity::new();
        let sequencer = BootstrapSequencer::start(&monitor, theme());

        monitor.push(true).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sequencer.state(), BootstrapState::Loading);

        let mut rx = sequencer.subscribe();
        rx.wait_for(|s| *s == BootstrapState::Ready).await.unwrap();
        sequencer.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_when_first_reading_is_false() {
        let monitor = ScriptedConnectivity::new();
        let sequencer = BootstrapSequencer::start(&monitor, theme());

        monitor.push(false).await;
        let mut rx = sequencer.subscribe();
        rx.wait_for(|s| *s == BootstrapState::Offline)
            .await
            .unwrap();
        sequencer.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_offline_oscillation() {
        let monitor = ScriptedConnectivity::new();
        let sequencer = BootstrapSequencer::start(&monitor, theme());
        let mut rx = sequencer.subscribe();

        monitor.push(true).await;
        rx.wait_for(|s| *s == BootstrapState::Ready).await.unwrap();

        monitor.push(false).await;
        rx.wait_for(|s| *s == BootstrapState::Offline)
            .await
            .unwrap();

        monitor.push(true).await;
        rx.wait_for(|s| *s == BootstrapState::Ready).await.unwrap();
        sequencer.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_readings_produce_no_transitions() {
        let monitor = ScriptedConnectivity::new();
        let sequencer = BootstrapSequencer::start(&monitor, theme());
        let mut rx = sequencer.subscribe();

        monitor.push(true).await;
        rx.wait_for(|s| *s == BootstrapState::Ready).await.unwrap();

        // Same value again, twice: the watch channel must not notify.
        monitor.push(true).await;
        monitor.push(true).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!rx.has_changed().unwrap());

        monitor.push(false).await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), BootstrapState::Offline);
        sequencer.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_detaches_subscriber() {
        let monitor = ScriptedConnectivity::new();
        let sequencer = BootstrapSequencer::start(&monitor, theme());
        assert_eq!(monitor.subscriber_count(), 1);
        sequencer.shutdown();
        tokio::task::yield_now().await;
        assert_eq!(monitor.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_theme_load_failure_does_not_gate_bootstrap() {
        let store = Arc::new(MockPreferences::new());
        store.fail_reads("backing store gone");
        let theme = ThemeCoordinator::new(store);

        let monitor = ScriptedConnectivity::new();
        let sequencer = BootstrapSequencer::start(&monitor, theme.clone());

        monitor.push(true).await;
        let mut rx = sequencer.subscribe();
        rx.wait_for(|s| *s == BootstrapState::Ready).await.unwrap();
        assert!(!theme.is_dark());
        sequencer.shutdown();
    }
}
