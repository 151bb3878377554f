//! Trait abstractions for dependency injection and testability.
//!
//! Every external collaborator of the orchestration layer is consumed
//! through one of these seams, so production adapters and test doubles are
//! interchangeable.
//!
//! # Traits
//!
//! - [`PreferenceStore`] - async key/value persistence
//! - [`ConnectivityMonitor`] - push+pull network reachability signal
//! - [`DataSource`] - remote page fetch for a feed
//! - [`MarketDataClient`] - current snapshot + historical series fetches

pub mod connectivity;
pub mod market;
pub mod preferences;
pub mod source;

pub use connectivity::{ConnectivityEvents, ConnectivityMonitor, Subscription};
pub use market::MarketDataClient;
pub use preferences::{keys, PreferenceStore};
pub use source::DataSource;
