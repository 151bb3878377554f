//! Paginated data source trait consumed by the feed controller.

use async_trait::async_trait;

use crate::error::FetchError;

/// Remote fetch for one feed, addressed by page index.
///
/// Implementations decide the page size and the item type; the controller
/// only sequences page indexes. Item identity lives in the payload (an id
/// field), item order is arrival order within one generation.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Payload carried by this feed.
    type Item: Clone + Send + Sync + 'static;

    /// Fetch one page of items, ordered.
    ///
    /// An empty vec is a valid response and means the feed is exhausted at
    /// this cursor; the controller still advances past it.
    async fn fetch_page(&self, page: usize) -> Result<Vec<Self::Item>, FetchError>;
}
