//! Generic paginated feed controller.
//!
//! One controller per feed. Each owns its items, cursor, in-flight flag and
//! generation counter, and publishes every mutation as one immutable
//! [`FeedSnapshot`] on a watch channel.
//!
//! The race discipline:
//!
//! - **In-flight guard**: [`FeedController::load_next`] is a no-op while a
//!   fetch is outstanding, so hammering it never issues a second request.
//! - **Generation counter**: [`FeedController::refresh`] and
//!   [`FeedController::reset`] bump the generation; a completion carrying an
//!   older generation is discarded without touching items or cursor.
//!   Superseded fetches are never cancelled, only ignored.
//! - **Ordering**: at most one outstanding fetch plus a sequential cursor
//!   means items are appended in request-issue order, never interleaved
//!   across generations.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::traits::DataSource;

/// Immutable view of a feed, published whole on every mutation.
#[derive(Debug, Clone)]
pub struct FeedSnapshot<T> {
    /// Accumulated items, append-only until a refresh/reset.
    pub items: Vec<T>,
    /// Next page index to fetch.
    pub cursor: usize,
    /// Whether a fetch is outstanding.
    pub in_flight: bool,
    /// Bumped on every refresh/reset.
    pub generation: u64,
    /// Last load failure, cleared by the next successful load or refresh.
    /// Prior items stay visible alongside it.
    pub last_error: Option<String>,
}

impl<T> Default for FeedSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            in_flight: false,
            generation: 0,
            last_error: None,
        }
    }
}

struct FeedState<T> {
    items: Vec<T>,
    cursor: usize,
    /// Generation of the outstanding fetch, if any.
    in_flight: Option<u64>,
    generation: u64,
    last_error: Option<String>,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            in_flight: None,
            generation: 0,
            last_error: None,
        }
    }
}

struct FeedInner<T> {
    state: Mutex<FeedState<T>>,
    tx: watch::Sender<FeedSnapshot<T>>,
}

impl<T: Clone> FeedInner<T> {
    /// Publish the current state. Caller holds the lock; the critical
    /// section never suspends.
    fn publish(&self, state: &FeedState<T>) {
        self.tx.send_replace(FeedSnapshot {
            items: state.items.clone(),
            cursor: state.cursor,
            in_flight: state.in_flight.is_some(),
            generation: state.generation,
            last_error: state.last_error.clone(),
        });
    }
}

/// Paginated accumulation with an in-flight guard and stale-result
/// suppression, instantiated once per feed.
pub struct FeedController<S: DataSource> {
    source: Arc<S>,
    inner: Arc<FeedInner<S::Item>>,
}

impl<S: DataSource> FeedController<S> {
    pub fn new(source: Arc<S>) -> Self {
        let (tx, _rx) = watch::channel(FeedSnapshot::default());
        Self {
            source,
            inner: Arc::new(FeedInner {
                state: Mutex::new(FeedState::default()),
                tx,
            }),
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> FeedSnapshot<S::Item> {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to snapshot publications.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot<S::Item>> {
        self.inner.tx.subscribe()
    }

    /// Fetch the next page in the background.
    ///
    /// Returns `false` (and does nothing) while a fetch is outstanding. On
    /// fresh success the batch is appended and the cursor advances; on stale
    /// success the result is dropped; on failure the items and cursor are
    /// left untouched and the error lands in the snapshot.
    pub fn load_next(&self) -> bool {
        let (generation, cursor) = {
            let mut state = self.inner.state.lock().unwrap();
            if state.in_flight.is_some() {
                return false;
            }
            state.in_flight = Some(state.generation);
            self.inner.publish(&state);
            (state.generation, state.cursor)
        };

        let source = Arc::clone(&self.source);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = source.fetch_page(cursor).await;
            let mut state = inner.state.lock().unwrap();

            if state.generation != generation {
                // Superseded while we were fetching. Only the newest call
                // may own the in-flight flag.
                if state.in_flight == Some(generation) {
                    state.in_flight = None;
                    inner.publish(&state);
                }
                tracing::debug!(
                    stale = generation,
                    current = state.generation,
                    page = cursor,
                    "discarding stale page fetch"
                );
                return;
            }

            match result {
                Ok(batch) => {
                    state.items.extend(batch);
                    state.cursor += 1;
                    state.in_flight = None;
                    state.last_error = None;
                }
                Err(err) => {
                    tracing::warn!(%err, page = cursor, "feed page load failed");
                    state.in_flight = None;
                    state.last_error = Some(err.to_string());
                }
            }
            inner.publish(&state);
        });
        true
    }

    /// Drop everything, bump the generation (neutralizing any outstanding
    /// fetch) and immediately load the first page.
    pub fn refresh(&self) {
        self.clear();
        self.load_next();
    }

    /// Equivalent to constructing a fresh controller; used when the feed's
    /// identity changes (e.g. a new content type is selected).
    pub fn reset(&self) {
        self.clear();
    }

    fn clear(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.items.clear();
        state.cursor = 0;
        state.generation += 1;
        state.in_flight = None;
        state.last_error = None;
        self.inner.publish(&state);
    }
}
