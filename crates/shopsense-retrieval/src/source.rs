//! In-memory catalog source.

use async_trait::async_trait;
use shopsense_core::error::Result;
use shopsense_core::traits::CatalogSource;
use shopsense_core::types::CatalogRecord;

/// A `CatalogSource` over a fixed record set.
///
/// Lets the engine run without a live system of record: embedded setups,
/// demos, and tests hand it the rows directly. Row order is preserved and
/// defines index positions, exactly as with any other source.
pub struct MemoryCatalog {
    records: Vec<CatalogRecord>,
}

impl MemoryCatalog {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_all(&self) -> Result<Vec<CatalogRecord>> {
        Ok(self.records.clone())
    }
}
