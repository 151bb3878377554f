//! Scripted and manually-gated data sources for feed controller tests.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::FetchError;
use crate::traits::DataSource;

/// [`DataSource`] that answers each call from a pre-scripted list, in order.
pub struct ScriptedSource<T> {
    script: Mutex<std::vec::IntoIter<Result<Vec<T>, FetchError>>>,
    pages: Mutex<Vec<usize>>,
}

impl<T> ScriptedSource<T> {
    pub fn new(script: Vec<Result<Vec<T>, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter()),
            pages: Mutex::new(Vec::new()),
        }
    }

    /// Page indexes requested so far, in order.
    pub fn pages_served(&self) -> Vec<usize> {
        self.pages.lock().unwrap().clone()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> DataSource for ScriptedSource<T> {
    type Item = T;

    async fn fetch_page(&self, page: usize) -> Result<Vec<T>, FetchError> {
        self.pages.lock().unwrap().push(page);
        self.script
            .lock()
            .unwrap()
            .next()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// [`DataSource`] whose calls block until the test releases them, for
/// constructing in-flight and stale-generation races.
pub struct GatedSource<T> {
    calls: Mutex<Vec<Option<oneshot::Sender<Result<Vec<T>, FetchError>>>>>,
}

impl<T> GatedSource<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of fetches started so far.
    pub fn started(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Resolve the oldest unresolved call.
    pub async fn release(&self, result: Result<Vec<T>, FetchError>) {
        let index = {
            let calls = self.calls.lock().unwrap();
            calls
                .iter()
                .position(|slot| slot.is_some())
                .expect("no unresolved call to release")
        };
        self.release_nth(index, result).await;
    }

    /// Resolve the `n`th started call (zero-based).
    pub async fn release_nth(&self, n: usize, result: Result<Vec<T>, FetchError>) {
        let tx = self.calls.lock().unwrap()[n]
            .take()
            .expect("call already released");
        let _ = tx.send(result);
        // Let the resumed fetch task run.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }
}

impl<T> Default for GatedSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> DataSource for GatedSource<T> {
    type Item = T;

    async fn fetch_page(&self, _page: usize) -> Result<Vec<T>, FetchError> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Connection("gate dropped".to_string())))
    }
}
