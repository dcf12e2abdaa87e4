//! # ShopSense Core
//!
//! Shared foundation for the ShopSense retrieval engine: configuration,
//! the error taxonomy, catalog/match types, and the async traits at the
//! system seams (catalog source, embedding backend).
//!
//! Nothing in here talks to the network; implementations live in the
//! sibling crates and are wired in as `Box<dyn Trait>`.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::ShopSenseConfig;
pub use error::{Result, ShopSenseError};
pub use types::{CatalogRecord, CorpusItem, ItemKind, MatchResult};
