//! Market snapshot tracker: dependent two-call fetch with staleness
//! suppression.
//!
//! A selection change issues the current-snapshot and history-series calls
//! concurrently and treats them as one unit: both must succeed before
//! anything is published, so a snapshot is never visible without its series.
//! Selection changes bump a generation counter owned by this tracker alone
//! (never shared with the article feed or any other controller); completions
//! from an older selection are discarded.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::models::MarketPair;
use crate::traits::MarketDataClient;

/// History range requested for the chart, in days.
pub const SERIES_RANGE_DAYS: u32 = 180;

/// Default coin shown when the panel opens.
pub const DEFAULT_SELECTION: &str = "bitcoin";

/// Immutable view of the tracker, published whole on every mutation.
#[derive(Debug, Clone)]
pub struct MarketView {
    /// Currently selected coin id.
    pub selected: String,
    /// Last successfully loaded pair, possibly from an earlier selection
    /// while a newer one is loading.
    pub pair: Option<MarketPair>,
    /// Whether a selection fetch is outstanding.
    pub loading: bool,
    /// Last fetch failure for the current selection.
    pub last_error: Option<String>,
}

struct MarketState {
    selected: String,
    generation: u64,
}

struct MarketInner {
    state: Mutex<MarketState>,
    tx: watch::Sender<MarketView>,
}

/// Tracker for the price panel, one per screen.
pub struct MarketTracker<C: MarketDataClient> {
    client: Arc<C>,
    inner: Arc<MarketInner>,
}

impl<C: MarketDataClient> MarketTracker<C> {
    /// Create a tracker with [`DEFAULT_SELECTION`] selected but nothing
    /// loaded yet; callers follow up with [`MarketTracker::refresh`].
    pub fn new(client: Arc<C>) -> Self {
        let (tx, _rx) = watch::channel(MarketView {
            selected: DEFAULT_SELECTION.to_string(),
            pair: None,
            loading: false,
            last_error: None,
        });
        Self {
            client,
            inner: Arc::new(MarketInner {
                state: Mutex::new(MarketState {
                    selected: DEFAULT_SELECTION.to_string(),
                    generation: 0,
                }),
                tx,
            }),
        }
    }

    /// Latest published view.
    pub fn view(&self) -> MarketView {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to view publications.
    pub fn subscribe(&self) -> watch::Receiver<MarketView> {
        self.inner.tx.subscribe()
    }

    /// Change the selected coin and fetch its snapshot + series.
    pub fn select(&self, id: &str) {
        let generation = {
            let mut state = self.inner.state.lock().unwrap();
            state.selected = id.to_string();
            state.generation += 1;
            state.generation
        };
        self.spawn_fetch(id.to_string(), generation);
    }

    /// Re-fetch the current selection under a new generation. Composes with
    /// any concurrent feed refresh; the counters are independent.
    pub fn refresh(&self) {
        let (id, generation) = {
            let mut state = self.inner.state.lock().unwrap();
            state.generation += 1;
            (state.selected.clone(), state.generation)
        };
        self.spawn_fetch(id, generation);
    }

    fn spawn_fetch(&self, id: String, generation: u64) {
        self.inner.tx.send_modify(|view| {
            view.selected = id.clone();
            view.loading = true;
            view.last_error = None;
        });

        let client = Arc::clone(&self.client);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            // Both calls must succeed; one failure fails the pair.
            let result = tokio::try_join!(
                client.fetch_snapshot(&id),
                client.fetch_series(&id, SERIES_RANGE_DAYS),
            );

            let state = inner.state.lock().unwrap();
            if state.generation != generation {
                tracing::debug!(
                    coin = %id,
                    stale = generation,
                    current = state.generation,
                    "discarding stale market fetch"
                );
                return;
            }

            match result {
                Ok((snapshot, series)) => {
                    inner.tx.send_modify(|view| {
                        view.pair = Some(MarketPair {
                            snapshot,
                            series,
                            generation,
                        });
                        view.loading = false;
                        view.last_error = None;
                    });
                }
                Err(err) => {
                    tracing::warn!(%err, coin = %id, "market fetch failed, no partial update");
                    inner.tx.send_modify(|view| {
                        view.loading = false;
                        view.last_error = Some(err.to_string());
                    });
                }
            }
        });
    }
}
