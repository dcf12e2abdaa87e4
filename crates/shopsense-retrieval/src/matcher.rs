//! Similarity resolver.
//!
//! `SemanticMatcher` owns the catalog source, the embedding backend, and the
//! current corpus snapshot. Queries run lock-free against an immutable
//! snapshot; a refresh builds its replacement completely off to the side and
//! publishes it with one pointer swap, so in-flight searches finish against
//! the snapshot they started with.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use rand::seq::SliceRandom;
use shopsense_core::config::{RetrievalConfig, ShopSenseConfig};
use shopsense_core::error::{Result, ShopSenseError};
use shopsense_core::traits::{CatalogSource, Embedder};
use shopsense_core::types::MatchResult;

use crate::corpus::{self, CorpusSnapshot};
use crate::index::l2_normalize;

/// Tokens whose presence anywhere in a lowercased message marks it as a
/// greeting.
const GREETING_TOKENS: &[&str] = &["สวัสดี", "หวัดดี", "ดี", "hi", "hello", "hey"];

/// Case-insensitive substring check against the fixed greeting token set.
///
/// Deliberately permissive: a token matching inside a longer word still
/// counts, matching how the upstream bot behaves.
pub fn is_greeting(text: &str) -> bool {
    let lowered = text.to_lowercase();
    GREETING_TOKENS.iter().any(|token| lowered.contains(token))
}

/// Semantic matcher over the catalog corpus.
pub struct SemanticMatcher {
    source: Box<dyn CatalogSource>,
    embedder: Box<dyn Embedder>,
    retrieval: RetrievalConfig,
    /// Bound on query-time encoding; a stuck backend fails the query
    /// instead of hanging the message handler.
    timeout: Duration,
    state: RwLock<Arc<CorpusSnapshot>>,
}

impl SemanticMatcher {
    /// Create a matcher with an empty corpus. Call [`load`](Self::load)
    /// before serving queries.
    pub fn new(
        source: Box<dyn CatalogSource>,
        embedder: Box<dyn Embedder>,
        config: &ShopSenseConfig,
    ) -> Self {
        Self {
            source,
            embedder,
            retrieval: config.retrieval.clone(),
            timeout: Duration::from_secs(config.embedding.timeout_secs),
            state: RwLock::new(Arc::new(CorpusSnapshot::empty())),
        }
    }

    /// Create a matcher with the embedding backend named in the config.
    pub fn from_config(source: Box<dyn CatalogSource>, config: &ShopSenseConfig) -> Result<Self> {
        let embedder = shopsense_embeddings::create_embedder(config)?;
        Ok(Self::new(source, embedder, config))
    }

    /// Override the query-encoding timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a fresh snapshot from the source and publish it. Returns the
    /// number of indexed items. Concurrent readers keep whatever snapshot
    /// they already hold.
    pub async fn load(&self) -> Result<usize> {
        let snapshot = corpus::build_snapshot(self.source.as_ref(), self.embedder.as_ref()).await?;
        let count = snapshot.len();
        *self.state.write().unwrap() = Arc::new(snapshot);
        tracing::info!(items = count, "corpus snapshot published");
        Ok(count)
    }

    /// Rebuild the corpus on demand. Edits in the system of record are only
    /// visible after this completes.
    pub async fn refresh(&self) -> Result<usize> {
        self.load().await
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        self.state.read().unwrap().clone()
    }

    pub fn corpus_len(&self) -> usize {
        self.snapshot().len()
    }

    /// Ranked matches above the configured threshold, configured top-k.
    pub async fn find_matches(&self, text: &str) -> Result<Vec<MatchResult>> {
        self.find_matches_with(text, self.retrieval.threshold, self.retrieval.top_k)
            .await
    }

    /// Ranked matches with caller-supplied threshold and top-k.
    ///
    /// Similarity is `1 − squared L2 distance` over unit vectors; results
    /// below `threshold` are dropped, rank order is preserved. An empty
    /// corpus yields `Ok(vec![])`. Embedding failures and timeouts
    /// propagate so the caller can fall back to a generic reply.
    pub async fn find_matches_with(
        &self,
        text: &str,
        threshold: f32,
        top_k: usize,
    ) -> Result<Vec<MatchResult>> {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            tracing::debug!("match request against empty corpus");
            return Ok(Vec::new());
        }

        let query = self.embed_query(text, &snapshot).await?;
        let mut matches = Vec::new();
        for (position, distance) in snapshot.index().search(&query, top_k) {
            let similarity = 1.0 - distance;
            if similarity < threshold {
                continue;
            }
            if let Some(key) = snapshot.label(position) {
                matches.push(MatchResult {
                    key: key.to_string(),
                    similarity,
                    payload: snapshot.reply_for(key).unwrap_or_default().to_string(),
                });
            }
        }
        Ok(matches)
    }

    /// Top-k `(key, similarity)` pairs with no threshold filtering.
    pub async fn find_top(&self, text: &str, k: usize) -> Result<Vec<(String, f32)>> {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            tracing::debug!("top-k request against empty corpus");
            return Ok(Vec::new());
        }

        let query = self.embed_query(text, &snapshot).await?;
        Ok(snapshot
            .index()
            .search(&query, k)
            .into_iter()
            .filter_map(|(position, distance)| {
                snapshot
                    .label(position)
                    .map(|key| (key.to_string(), 1.0 - distance))
            })
            .collect())
    }

    /// A uniformly random Greeting-kind reply from the current snapshot.
    pub fn random_greeting(&self) -> Option<String> {
        let snapshot = self.snapshot();
        let greetings = snapshot.greeting_replies();
        greetings
            .choose(&mut rand::thread_rng())
            .map(|s| s.to_string())
    }

    /// Encode the query text in the corpus embedding space.
    async fn embed_query(&self, text: &str, snapshot: &CorpusSnapshot) -> Result<Vec<f32>> {
        let batch = [text.to_string()];
        let vectors = tokio::time::timeout(self.timeout, self.embedder.embed(&batch))
            .await
            .map_err(|_| {
                ShopSenseError::Embedding(format!(
                    "{} did not answer within {:?}",
                    self.embedder.name(),
                    self.timeout
                ))
            })??;

        let mut query = vectors.into_iter().next().ok_or_else(|| {
            ShopSenseError::Embedding(format!("{} returned no query vector", self.embedder.name()))
        })?;
        l2_normalize(&mut query);

        // Same model + normalization as the corpus build, or the 1 − distance
        // scores stop meaning anything.
        if query.len() != snapshot.dimension() {
            return Err(ShopSenseError::Embedding(format!(
                "query dimension {} does not match corpus dimension {}",
                query.len(),
                snapshot.dimension()
            )));
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryCatalog;
    use crate::testutil::{SlowEmbedder, StaticEmbedder, drink_records};
    use async_trait::async_trait;
    use shopsense_core::types::{CatalogRecord, ItemKind};

    fn latte_mocha_matcher() -> SemanticMatcher {
        let records = vec![
            CatalogRecord::named(ItemKind::Product, "Latte", "Smooth milk coffee"),
            CatalogRecord::named(ItemKind::Product, "Mocha", "Chocolate coffee blend"),
        ];
        SemanticMatcher::new(
            Box::new(MemoryCatalog::new(records)),
            Box::new(StaticEmbedder::drinks()),
            &ShopSenseConfig::default(),
        )
    }

    fn drinks_matcher() -> SemanticMatcher {
        SemanticMatcher::new(
            Box::new(MemoryCatalog::new(drink_records())),
            Box::new(StaticEmbedder::drinks()),
            &ShopSenseConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_scenario_latte_mocha() {
        let matcher = latte_mocha_matcher();
        matcher.load().await.unwrap();

        let matches = matcher
            .find_matches_with("coffee with chocolate", 0.0, 2)
            .await
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].key, "Mocha");
        assert_eq!(matches[0].payload, "Chocolate coffee blend");
        assert_eq!(matches[1].key, "Latte");
        assert!(matches[0].similarity >= matches[1].similarity);
    }

    #[tokio::test]
    async fn test_default_threshold_filters_weak_matches() {
        let matcher = latte_mocha_matcher();
        matcher.load().await.unwrap();

        // Defaults: threshold 0.5, top_k 3. Latte scores well below 0.5
        let matches = matcher.find_matches("coffee with chocolate").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].key, "Mocha");
    }

    #[tokio::test]
    async fn test_exact_label_ranks_top() {
        let matcher = drinks_matcher();
        matcher.load().await.unwrap();

        let top = matcher.find_top("Latte", 5).await.unwrap();
        assert_eq!(top[0].0, "Latte");
        assert!((top[0].1 - 1.0).abs() < 1e-5);
        for (_, similarity) in &top[1..] {
            assert!(top[0].1 >= *similarity);
        }
    }

    #[tokio::test]
    async fn test_find_top_does_not_filter() {
        let matcher = drinks_matcher();
        matcher.load().await.unwrap();

        let top = matcher.find_top("coffee with chocolate", 10).await.unwrap();
        // min(k, corpus size) results, including negative similarities
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].0, "Mocha");
        assert!(top.last().unwrap().1 < 0.0);
    }

    #[tokio::test]
    async fn test_empty_corpus_returns_no_matches() {
        let matcher = SemanticMatcher::new(
            Box::new(MemoryCatalog::new(vec![])),
            // No query vectors registered: proves the embedder is never hit
            Box::new(StaticEmbedder::with_vector("unused", vec![1.0])),
            &ShopSenseConfig::default(),
        );
        matcher.load().await.unwrap();

        assert!(matcher.find_matches("anything").await.unwrap().is_empty());
        assert!(matcher.find_top("anything", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_threshold_monotonicity() {
        let matcher = drinks_matcher();
        matcher.load().await.unwrap();

        let mut previous = usize::MAX;
        for threshold in [0.0, 0.3, 0.5, 0.9] {
            let count = matcher
                .find_matches_with("coffee with chocolate", threshold, 5)
                .await
                .unwrap()
                .len();
            assert!(count <= previous);
            previous = count;
        }
    }

    #[tokio::test]
    async fn test_determinism() {
        let matcher = drinks_matcher();
        matcher.load().await.unwrap();

        let a = matcher
            .find_matches_with("coffee with chocolate", 0.0, 5)
            .await
            .unwrap();
        let b = matcher
            .find_matches_with("coffee with chocolate", 0.0, 5)
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_duplicate_labels_resolve_to_latest_payload() {
        let records = vec![
            CatalogRecord::named(ItemKind::Product, "Combo", "old reply"),
            CatalogRecord::named(ItemKind::Product, "Combo", "new reply"),
        ];
        let embedder = StaticEmbedder::with_vector("Combo", vec![1.0, 0.0, 0.0]);
        let matcher = SemanticMatcher::new(
            Box::new(MemoryCatalog::new(records)),
            Box::new(embedder),
            &ShopSenseConfig::default(),
        );
        matcher.load().await.unwrap();

        let matches = matcher.find_matches_with("Combo", 0.0, 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        for result in matches {
            assert_eq!(result.payload, "new reply");
        }
    }

    #[tokio::test]
    async fn test_unknown_query_embedding_failure_propagates() {
        let matcher = drinks_matcher();
        matcher.load().await.unwrap();

        let err = matcher.find_matches("uncharted text").await.unwrap_err();
        assert!(matches!(err, ShopSenseError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_query_timeout() {
        let matcher = SemanticMatcher::new(
            Box::new(MemoryCatalog::new(vec![CatalogRecord::named(
                ItemKind::Product,
                "Latte",
                "reply",
            )])),
            Box::new(SlowEmbedder {
                delay: Duration::from_millis(200),
            }),
            &ShopSenseConfig::default(),
        )
        .with_timeout(Duration::from_millis(50));
        matcher.load().await.unwrap();

        let err = matcher.find_matches("Latte").await.unwrap_err();
        assert!(matches!(err, ShopSenseError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let matcher = SemanticMatcher::new(
            Box::new(MemoryCatalog::new(vec![CatalogRecord::named(
                ItemKind::Product,
                "Latte",
                "reply",
            )])),
            Box::new(StaticEmbedder::new(&[
                ("Latte", &[0.6, 0.8, 0.0]),
                ("short query", &[1.0]),
            ])),
            &ShopSenseConfig::default(),
        );
        matcher.load().await.unwrap();

        let err = matcher.find_matches("short query").await.unwrap_err();
        assert!(matches!(err, ShopSenseError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_refresh_publishes_new_snapshot() {
        use std::sync::Mutex;

        struct SwappableCatalog {
            records: Arc<Mutex<Vec<CatalogRecord>>>,
        }

        #[async_trait]
        impl CatalogSource for SwappableCatalog {
            fn name(&self) -> &str {
                "swappable"
            }
            async fn fetch_all(&self) -> Result<Vec<CatalogRecord>> {
                Ok(self.records.lock().unwrap().clone())
            }
        }

        let records = Arc::new(Mutex::new(vec![CatalogRecord::named(
            ItemKind::Product,
            "Latte",
            "reply",
        )]));
        let matcher = SemanticMatcher::new(
            Box::new(SwappableCatalog {
                records: records.clone(),
            }),
            Box::new(StaticEmbedder::drinks()),
            &ShopSenseConfig::default(),
        );
        matcher.load().await.unwrap();

        let before = matcher.snapshot();
        records.lock().unwrap().push(CatalogRecord::named(
            ItemKind::Product,
            "Mocha",
            "reply",
        ));
        let count = matcher.refresh().await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(matcher.corpus_len(), 2);
        // A reader holding the old snapshot is undisturbed by the swap
        assert_eq!(before.len(), 1);
    }

    #[tokio::test]
    async fn test_random_greeting() {
        let matcher = drinks_matcher();
        matcher.load().await.unwrap();
        assert_eq!(
            matcher.random_greeting().as_deref(),
            Some("Hi! Welcome to the shop")
        );

        let empty = SemanticMatcher::new(
            Box::new(MemoryCatalog::new(vec![])),
            Box::new(StaticEmbedder::drinks()),
            &ShopSenseConfig::default(),
        );
        empty.load().await.unwrap();
        assert!(empty.random_greeting().is_none());
    }

    #[test]
    fn test_is_greeting_tokens() {
        assert!(is_greeting("Hello there!"));
        assert!(is_greeting("HI"));
        assert!(is_greeting("สวัสดีครับ"));
        assert!(is_greeting("หวัดดีจ้า"));
        // Substring semantics are intentionally permissive
        assert!(is_greeting("they said so"));
        assert!(!is_greeting("mocha please"));
        assert!(!is_greeting(""));
    }
}
