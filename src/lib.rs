//! Haven - client orchestration core for a content-reading app
//!
//! This library exposes the startup state machine, the feed controllers and
//! the preference coordinators; screens consume them through watch
//! receivers.

pub mod adapters;
pub mod bootstrap;
pub mod catalog;
pub mod error;
pub mod feed;
pub mod market;
pub mod models;
pub mod profile;
pub mod theme;
pub mod traits;
