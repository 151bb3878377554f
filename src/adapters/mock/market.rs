//! Mock market data client with per-coin results and manual gating.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::FetchError;
use crate::models::CoinSnapshot;
use crate::traits::MarketDataClient;

#[derive(Default)]
struct Shared {
    snapshots: HashMap<String, Result<CoinSnapshot, FetchError>>,
    series: HashMap<String, Result<Vec<f64>, FetchError>>,
    gated: HashSet<String>,
    calls: Vec<String>,
}

/// [`MarketDataClient`] whose results are configured per coin id.
#[derive(Clone, Default)]
pub struct MockMarketClient {
    shared: Arc<Mutex<Shared>>,
    gate: Arc<Notify>,
}

impl MockMarketClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_snapshot(&self, id: &str, result: Result<CoinSnapshot, FetchError>) {
        self.shared
            .lock()
            .unwrap()
            .snapshots
            .insert(id.to_string(), result);
    }

    pub fn set_series(&self, id: &str, result: Result<Vec<f64>, FetchError>) {
        self.shared
            .lock()
            .unwrap()
            .series
            .insert(id.to_string(), result);
    }

    /// Hold snapshot fetches for `id` until [`MockMarketClient::open_gate`].
    pub fn gate(&self, id: &str) {
        self.shared.lock().unwrap().gated.insert(id.to_string());
    }

    /// Release gated fetches and let them run.
    pub async fn open_gate(&self, id: &str) {
        self.shared.lock().unwrap().gated.remove(id);
        self.gate.notify_waiters();
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    /// Calls recorded as `"snapshot:<id>"` / `"series:<id>"`.
    pub fn calls(&self) -> Vec<String> {
        self.shared.lock().unwrap().calls.clone()
    }

    async fn wait_gate(&self, id: &str) {
        loop {
            let notified = self.gate.notified();
            if !self.shared.lock().unwrap().gated.contains(id) {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl MarketDataClient for MockMarketClient {
    async fn fetch_snapshot(&self, id: &str) -> Result<CoinSnapshot, FetchError> {
        self.shared
            .lock()
            .unwrap()
            .calls
            .push(format!("snapshot:{id}"));
        self.wait_gate(id).await;
        self.shared
            .lock()
            .unwrap()
            .snapshots
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Connection(format!("no mock snapshot for {id}"))))
    }

    async fn fetch_series(&self, id: &str, _range_days: u32) -> Result<Vec<f64>, FetchError> {
        self.shared
            .lock()
            .unwrap()
            .calls
            .push(format!("series:{id}"));
        self.wait_gate(id).await;
        self.shared
            .lock()
            .unwrap()
            .series
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Connection(format!("no mock series for {id}"))))
    }
}
