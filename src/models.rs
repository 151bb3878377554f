//! Domain models for the reading catalog and the market panel.

use serde::{Deserialize, Serialize};

/// A story in the reading catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub chapters: u32,
    pub cover_url: String,
}

impl Story {
    /// Stub catalog used until the backend catalog API lands: 50 stories
    /// with title letters cycling A..Z.
    pub fn stub_corpus() -> Vec<Story> {
        (0..50)
            .map(|i| Story {
                id: i.to_string(),
                title: format!("Story {}{}", (b'A' + (i % 26) as u8) as char, i),
                chapters: 5 + (i % 20) as u32,
                cover_url: format!("https://placekitten.com/100/{}", 100 + i % 5),
            })
            .collect()
    }
}

/// A finance article in the infinite-scroll list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// Current market data for one coin, as returned by the markets endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    pub id: String,
    pub name: String,
    pub current_price: f64,
    pub price_change_percentage_24h: Option<f64>,
}

/// A snapshot and its historical price series, published as one unit.
///
/// The pair is only ever replaced wholesale: a snapshot without its series
/// (or the reverse) is never observable.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketPair {
    pub snapshot: CoinSnapshot,
    /// Price samples, oldest first.
    pub series: Vec<f64>,
    /// Generation of the selection that produced this pair.
    pub generation: u64,
}

/// A selectable coin in the market panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinOption {
    pub label: &'static str,
    pub id: &'static str,
}

/// Coins offered by the tracker selector.
pub const COIN_OPTIONS: &[CoinOption] = &[
    CoinOption {
        label: "Bitcoin",
        id: "bitcoin",
    },
    CoinOption {
        label: "Ethereum",
        id: "ethereum",
    },
    CoinOption {
        label: "Solana",
        id: "solana",
    },
    CoinOption {
        label: "Dogecoin",
        id: "dogecoin",
    },
];
