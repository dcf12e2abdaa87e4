//! Catalog source trait — the engine's sole input dependency.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::CatalogRecord;

/// Read access to the system of record.
///
/// The engine does not dictate the storage technology; anything that can
/// return the qualifying rows (categories, products, promotions, greetings)
/// with their raw label/payload fields can feed the corpus. Transport or
/// connectivity failure must surface as `ShopSenseError::Load`: without a
/// corpus the resolver cannot function, so the caller decides whether to
/// retry or abort startup.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Fetch every qualifying record. Row order defines index positions.
    async fn fetch_all(&self) -> Result<Vec<CatalogRecord>>;
}
