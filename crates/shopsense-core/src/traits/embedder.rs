//! Embedding backend trait.

use async_trait::async_trait;

use crate::error::Result;

/// Text → fixed-dimension vector encoding.
///
/// Implementations must be deterministic for identical input and model
/// version, and must produce vectors of consistent dimensionality across
/// calls within a process lifetime. Vectors are returned as the model
/// emits them; the retrieval layer owns L2 normalization so that corpus
/// and query encodings always live in the same space.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Encode a batch of texts, one vector per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Cheap reachability probe.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
