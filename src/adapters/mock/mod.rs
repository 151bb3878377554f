//! Test doubles for the trait seams.
//!
//! Each mock records the calls made against it and lets tests script
//! results, inject failures, or gate resolution manually to build the race
//! scenarios the controllers have to survive.

pub mod connectivity;
pub mod market;
pub mod preferences;
pub mod source;

pub use connectivity::ScriptedConnectivity;
pub use market::MockMarketClient;
pub use preferences::MockPreferences;
pub use source::{GatedSource, ScriptedSource};
