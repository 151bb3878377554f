//! Scripted connectivity monitor driven by the test.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::FetchError;
use crate::traits::{ConnectivityEvents, ConnectivityMonitor, Subscription};

struct Subscriber {
    id: u64,
    tx: mpsc::Sender<bool>,
}

#[derive(Default)]
struct Shared {
    subscribers: Vec<Subscriber>,
    next_id: u64,
    last: Option<bool>,
}

/// [`ConnectivityMonitor`] whose readings are pushed explicitly by tests.
#[derive(Clone, Default)]
pub struct ScriptedConnectivity {
    shared: Arc<Mutex<Shared>>,
}

impl ScriptedConnectivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a reading to every live subscriber.
    pub async fn push(&self, online: bool) {
        let senders: Vec<mpsc::Sender<bool>> = {
            let mut shared = self.shared.lock().unwrap();
            shared.last = Some(online);
            shared.subscribers.iter().map(|s| s.tx.clone()).collect()
        };
        for tx in senders {
            // A closed receiver just means the subscriber is shutting down.
            let _ = tx.send(online).await;
        }
    }

    /// Number of currently attached subscribers; drops to zero once every
    /// guard has been cancelled.
    pub fn subscriber_count(&self) -> usize {
        self.shared.lock().unwrap().subscribers.len()
    }
}

#[async_trait]
impl ConnectivityMonitor for ScriptedConnectivity {
    fn subscribe(&self) -> ConnectivityEvents {
        let (tx, rx) = mpsc::channel(16);
        let id = {
            let mut shared = self.shared.lock().unwrap();
            let id = shared.next_id;
            shared.next_id += 1;
            // Unlike the production probe, no initial reading is delivered:
            // tests script the first one explicitly.
            shared.subscribers.push(Subscriber { id, tx });
            id
        };

        let shared = Arc::clone(&self.shared);
        let guard = Subscription::new(move || {
            shared.lock().unwrap().subscribers.retain(|s| s.id != id);
        });
        ConnectivityEvents { rx, guard }
    }

    async fn fetch_once(&self) -> Result<bool, FetchError> {
        self.shared
            .lock()
            .unwrap()
            .last
            .ok_or_else(|| FetchError::Connection("no scripted reading".to_string()))
    }
}
