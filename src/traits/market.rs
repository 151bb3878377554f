//! Market data transport trait backing the snapshot tracker.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::CoinSnapshot;

/// Two independent calls against a market data provider.
///
/// The tracker issues both concurrently and treats them as one unit: a pair
/// is only published when both succeed.
#[async_trait]
pub trait MarketDataClient: Send + Sync + 'static {
    /// Fetch the current snapshot for a coin id.
    async fn fetch_snapshot(&self, id: &str) -> Result<CoinSnapshot, FetchError>;

    /// Fetch the historical price series for a coin id, oldest sample first.
    async fn fetch_series(&self, id: &str, range_days: u32) -> Result<Vec<f64>, FetchError>;
}
