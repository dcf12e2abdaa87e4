//! ShopSense error taxonomy.
//!
//! Two failure classes matter to callers: `Load` (the system of record is
//! unreachable or malformed; fatal to startup, retryable) and `Embedding`
//! (the encoding backend failed for one query; log it and degrade to an
//! empty match set). An empty corpus is a valid state, not an error, and
//! "no match found" is never surfaced through this enum.

use thiserror::Error;

/// All errors produced by the ShopSense crates.
#[derive(Debug, Error)]
pub enum ShopSenseError {
    /// The catalog source could not be read.
    #[error("Catalog load error: {0}")]
    Load(String),

    /// The embedding backend failed, timed out, or returned malformed output.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The selected backend requires an API key and none was found.
    #[error("API key missing for backend: {0}")]
    ApiKeyMissing(String),

    /// No embedding backend registered under this name.
    #[error("Unknown embedding backend: {0}")]
    BackendNotFound(String),

    /// Filesystem failure (config read/write).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ShopSenseError>;
