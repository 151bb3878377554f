//! Common helpers for integration tests.

use haven::feed::FeedSnapshot;
use haven::market::MarketView;
use tokio::sync::watch;

/// Wait until the feed has no outstanding fetch and return the snapshot.
pub async fn settled_feed<T: Clone + Send + Sync + 'static>(
    rx: &mut watch::Receiver<FeedSnapshot<T>>,
) -> FeedSnapshot<T> {
    rx.wait_for(|s| !s.in_flight).await.unwrap().clone()
}

/// Wait until the tracker has no outstanding fetch and return the view.
#[allow(dead_code)]
pub async fn settled_market(rx: &mut watch::Receiver<MarketView>) -> MarketView {
    rx.wait_for(|v| !v.loading).await.unwrap().clone()
}
