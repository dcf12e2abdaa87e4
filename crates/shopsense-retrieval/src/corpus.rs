//! Corpus loading and snapshot building.
//!
//! One load produces one immutable [`CorpusSnapshot`]: the ordered label
//! list (which defines index positions), the per-key kind and reply lookup
//! tables, and the flat vector index over the labels' embeddings. Additions
//! or edits in the system of record only show up after the next full reload;
//! there is no incremental update path.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shopsense_core::error::{Result, ShopSenseError};
use shopsense_core::traits::{CatalogSource, Embedder};
use shopsense_core::types::ItemKind;

use crate::index::{FlatIndex, l2_normalize};

/// One immutable, internally consistent version of the corpus plus its
/// embeddings.
///
/// Invariant: `labels.len() == index.len()` and `index.vector(i)` is the
/// normalized embedding of `labels[i]`. Duplicate keys may appear in the
/// label list; the lookup tables are last-write-wins, so every occurrence
/// of a duplicated label resolves to the reply of its latest source row.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    labels: Vec<String>,
    kinds: HashMap<String, ItemKind>,
    replies: HashMap<String, String>,
    index: FlatIndex,
    built_at: DateTime<Utc>,
}

impl CorpusSnapshot {
    /// A snapshot with no items. Searches against it return nothing.
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            kinds: HashMap::new(),
            replies: HashMap::new(),
            index: FlatIndex::empty(),
            built_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Embedding dimensionality; 0 for an empty snapshot.
    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn label(&self, position: usize) -> Option<&str> {
        self.labels.get(position).map(|s| s.as_str())
    }

    pub fn reply_for(&self, key: &str) -> Option<&str> {
        self.replies.get(key).map(|s| s.as_str())
    }

    pub fn kind_of(&self, key: &str) -> Option<ItemKind> {
        self.kinds.get(key).copied()
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Reply payloads of every Greeting-kind entry.
    pub fn greeting_replies(&self) -> Vec<&str> {
        self.kinds
            .iter()
            .filter(|(_, kind)| **kind == ItemKind::Greeting)
            .filter_map(|(key, _)| self.reply_for(key))
            .collect()
    }
}

/// Pull all qualifying records from the source, embed their labels in one
/// batch, and assemble a snapshot.
///
/// Records failing the per-kind extraction rule are skipped silently. A
/// source yielding zero usable items produces an empty snapshot and a
/// warning, not an error; downstream search then returns no matches.
/// Source connectivity failures and embedding failures propagate.
pub async fn build_snapshot(
    source: &dyn CatalogSource,
    embedder: &dyn Embedder,
) -> Result<CorpusSnapshot> {
    let records = source.fetch_all().await?;
    let total = records.len();

    let mut labels: Vec<String> = Vec::with_capacity(total);
    let mut kinds: HashMap<String, ItemKind> = HashMap::new();
    let mut replies: HashMap<String, String> = HashMap::new();

    for record in records {
        if let Some(item) = record.into_item() {
            labels.push(item.key.clone());
            kinds.insert(item.key.clone(), item.kind);
            replies.insert(item.key, item.payload);
        }
    }

    if labels.is_empty() {
        tracing::warn!(source = %source.name(), records = total, "no usable catalog data loaded");
        return Ok(CorpusSnapshot::empty());
    }
    if labels.len() < total {
        tracing::debug!(
            skipped = total - labels.len(),
            "skipped records with missing label or payload"
        );
    }

    let mut vectors = embedder.embed(&labels).await?;
    if vectors.len() != labels.len() {
        return Err(ShopSenseError::Embedding(format!(
            "{} returned {} vectors for {} labels",
            embedder.name(),
            vectors.len(),
            labels.len()
        )));
    }
    for v in vectors.iter_mut() {
        l2_normalize(v);
    }
    let index = FlatIndex::from_vectors(vectors)?;

    tracing::info!(
        items = labels.len(),
        dimension = index.dimension(),
        "corpus index built"
    );

    Ok(CorpusSnapshot {
        labels,
        kinds,
        replies,
        index,
        built_at: Utc::now(),
    })
}
