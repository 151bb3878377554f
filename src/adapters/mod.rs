//! Adapter implementations of the trait seams.
//!
//! Production adapters talk to the real world (filesystem, CoinGecko, an
//! HTTP reachability probe); the stub sources serve the built-in content
//! the app ships with; [`mock`] holds the test doubles.

pub mod coingecko;
pub mod file_preferences;
pub mod mock;
pub mod probe_connectivity;
pub mod stub_sources;

pub use coingecko::CoinGeckoClient;
pub use file_preferences::JsonFilePreferences;
pub use probe_connectivity::ProbeConnectivity;
pub use stub_sources::{StubArticleSource, StubStorySource};
