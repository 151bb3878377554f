//! CoinGecko-backed market data client.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::FetchError;
use crate::models::CoinSnapshot;
use crate::traits::MarketDataClient;

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// `market_chart` response shape: `prices` is a list of
/// `[timestamp_ms, price]` pairs.
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

/// [`MarketDataClient`] over the CoinGecko public API.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different host; used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response.json().await.map_err(FetchError::from_reqwest)
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataClient for CoinGeckoClient {
    async fn fetch_snapshot(&self, id: &str) -> Result<CoinSnapshot, FetchError> {
        let url = format!("{}/coins/markets?vs_currency=usd&ids={id}", self.base_url);
        let mut coins: Vec<CoinSnapshot> = self.get_json(&url).await?;
        if coins.is_empty() {
            return Err(FetchError::Malformed(format!("unknown coin id: {id}")));
        }
        Ok(coins.swap_remove(0))
    }

    async fn fetch_series(&self, id: &str, range_days: u32) -> Result<Vec<f64>, FetchError> {
        let url = format!(
            "{}/coins/{id}/market_chart?vs_currency=usd&days={range_days}",
            self.base_url
        );
        let chart: MarketChart = self.get_json(&url).await?;
        Ok(chart.prices.into_iter().map(|(_ts, price)| price).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_chart_parses_pairs() {
        let json = r#"{"prices":[[1700000000000,64000.5],[1700000360000,64100.0]]}"#;
        let chart: MarketChart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[0].1, 64000.5);
    }

    #[tokio::test]
    async fn test_connection_error_classified_transient() {
        // Nothing listens on this port.
        let client = CoinGeckoClient::with_base_url("http://127.0.0.1:59999");
        let err = client.fetch_snapshot("bitcoin").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Connection(_) | FetchError::Timeout(_)
        ));
    }
}
