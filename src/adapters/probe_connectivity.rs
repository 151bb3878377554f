//! Connectivity monitor that polls an HTTP endpoint.
//!
//! A background task probes the endpoint on an interval and pushes a reading
//! to all subscribers whenever it differs from the previous one (the first
//! reading always counts as a change). New subscribers get the last-known
//! reading immediately so the splash phase is not stuck waiting a full
//! interval.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::FetchError;
use crate::traits::{ConnectivityEvents, ConnectivityMonitor, Subscription};

const DEFAULT_PROBE_URL: &str = "https://clients3.google.com/generate_204";
const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Shared {
    subscribers: Mutex<Vec<(u64, mpsc::Sender<bool>)>>,
    last: Mutex<Option<bool>>,
}

/// Polling [`ConnectivityMonitor`].
pub struct ProbeConnectivity {
    client: reqwest::Client,
    url: String,
    shared: Arc<Shared>,
    next_id: AtomicU64,
    poller: JoinHandle<()>,
}

impl ProbeConnectivity {
    /// Start probing the default endpoint.
    pub fn spawn() -> Self {
        Self::spawn_with(DEFAULT_PROBE_URL, DEFAULT_INTERVAL)
    }

    /// Start probing `url` every `interval`.
    pub fn spawn_with(url: impl Into<String>, interval: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap_or_default();
        let url = url.into();
        let shared = Arc::new(Shared::default());

        let poller = {
            let client = client.clone();
            let url = url.clone();
            let shared = Arc::clone(&shared);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                loop {
                    ticker.tick().await;
                    let online = probe(&client, &url).await;
                    let changed = {
                        let mut last = shared.last.lock().unwrap();
                        let changed = *last != Some(online);
                        *last = Some(online);
                        changed
                    };
                    if !changed {
                        continue;
                    }
                    let senders: Vec<mpsc::Sender<bool>> = shared
                        .subscribers
                        .lock()
                        .unwrap()
                        .iter()
                        .map(|(_, tx)| tx.clone())
                        .collect();
                    for tx in senders {
                        let _ = tx.send(online).await;
                    }
                }
            })
        };

        Self {
            client,
            url,
            shared,
            next_id: AtomicU64::new(0),
            poller,
        }
    }

    /// Stop the polling task. Subscribers see their channels close.
    pub fn shutdown(self) {
        self.poller.abort();
    }
}

impl Drop for ProbeConnectivity {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

async fn probe(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(response) => response.status().is_success() || response.status().as_u16() == 204,
        Err(_) => false,
    }
}

#[async_trait]
impl ConnectivityMonitor for ProbeConnectivity {
    fn subscribe(&self) -> ConnectivityEvents {
        let (tx, rx) = mpsc::channel(16);
        if let Some(last) = *self.shared.last.lock().unwrap() {
            // try_send on a fresh channel of capacity 16 cannot fail.
            let _ = tx.try_send(last);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared.subscribers.lock().unwrap().push((id, tx));

        let shared = Arc::clone(&self.shared);
        let guard = Subscription::new(move || {
            shared
                .subscribers
                .lock()
                .unwrap()
                .retain(|(sub_id, _)| *sub_id != id);
        });
        ConnectivityEvents { rx, guard }
    }

    async fn fetch_once(&self) -> Result<bool, FetchError> {
        Ok(probe(&self.client, &self.url).await)
    }
}
