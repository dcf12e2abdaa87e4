//! Shared fixtures for the retrieval tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use shopsense_core::error::{Result, ShopSenseError};
use shopsense_core::traits::{CatalogSource, Embedder};
use shopsense_core::types::{CatalogRecord, ItemKind};

/// A deterministic lookup-table embedder. Axes in the drink fixtures read
/// as [milk, coffee, chocolate]; vectors are deliberately unnormalized so
/// the loader's normalization path is exercised.
pub struct StaticEmbedder {
    table: HashMap<String, Vec<f32>>,
}

impl StaticEmbedder {
    pub fn new(entries: &[(&str, &[f32])]) -> Self {
        let table = entries
            .iter()
            .map(|(text, v)| (text.to_string(), v.to_vec()))
            .collect();
        Self { table }
    }

    pub fn with_vector(text: &str, vector: Vec<f32>) -> Self {
        let mut table = HashMap::new();
        table.insert(text.to_string(), vector);
        Self { table }
    }

    /// Vectors for every label in [`drink_records`] plus common queries.
    pub fn drinks() -> Self {
        Self::new(&[
            ("Latte", &[0.6, 0.8, 0.0]),
            ("Mocha", &[0.0, 0.8, 0.6]),
            ("Hot Drinks", &[0.5, 0.5, 0.0]),
            ("Buy 1 Get 1", &[0.1, 0.1, 0.9]),
            ("Hello", &[0.9, 0.1, 0.1]),
            ("coffee with chocolate", &[0.0, 0.7071, 0.7071]),
        ])
    }
}

#[async_trait]
impl Embedder for StaticEmbedder {
    fn name(&self) -> &str {
        "static"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                self.table
                    .get(text)
                    .cloned()
                    .ok_or_else(|| ShopSenseError::Embedding(format!("no static vector: {text}")))
            })
            .collect()
    }
}

/// An embedder whose backend never answers.
pub struct SlowEmbedder {
    pub delay: Duration,
}

#[async_trait]
impl Embedder for SlowEmbedder {
    fn name(&self) -> &str {
        "slow"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        tokio::time::sleep(self.delay).await;
        Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
    }
}

/// An unreachable catalog source.
pub struct FailingCatalog;

#[async_trait]
impl CatalogSource for FailingCatalog {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_all(&self) -> Result<Vec<CatalogRecord>> {
        Err(ShopSenseError::Load("connection refused".into()))
    }
}

/// A small catalog covering all four kinds.
pub fn drink_records() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::named(ItemKind::Product, "Latte", "Smooth milk coffee"),
        CatalogRecord::named(ItemKind::Product, "Mocha", "Chocolate coffee blend"),
        CatalogRecord::named(ItemKind::Category, "Hot Drinks", "Pick a hot drink"),
        CatalogRecord::promotion("Buy 1 Get 1", "Every Friday with a member card"),
        CatalogRecord::named(ItemKind::Greeting, "Hello", "Hi! Welcome to the shop"),
    ]
}
