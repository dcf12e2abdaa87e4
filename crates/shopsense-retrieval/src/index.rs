//! Flat exact nearest-neighbor index.
//!
//! Brute-force scan under squared Euclidean distance. Every stored vector is
//! L2-normalized, which makes squared-L2 ranking equivalent to cosine ranking
//! and is what lets the resolver reinterpret `1 − distance` as a similarity
//! score. That coupling is load-bearing: feed this index unnormalized vectors
//! and every downstream score is meaningless. Both the corpus build path and
//! the query path normalize through [`l2_normalize`] in this module.

use shopsense_core::error::{Result, ShopSenseError};

/// Squared Euclidean distance between two vectors.
#[inline]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left as-is.
#[inline]
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Exact nearest-neighbor index over a fixed set of vectors.
///
/// Immutable once built; a corpus refresh builds a whole new index rather
/// than mutating this one.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// An index with no vectors and an undefined dimension.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a complete vector set. The dimension is fixed by the first
    /// vector; any row with a different length is rejected.
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);
        if vectors.iter().any(|v| v.len() != dimension) {
            return Err(ShopSenseError::Embedding(
                "Vectors of inconsistent dimension cannot be indexed".into(),
            ));
        }
        Ok(Self { dimension, vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector dimensionality; 0 while the index is empty.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        self.vectors.get(position).map(|v| v.as_slice())
    }

    /// Return up to `k` nearest vectors as `(position, distance)` pairs,
    /// best match first. Ties keep insertion order. An empty index returns
    /// an empty result for any input.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if self.vectors.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| (position, squared_l2(query, v)))
            .collect();
        // Stable sort: equal distances stay in corpus insertion order
        candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates.truncate(k.min(self.vectors.len()));
        candidates
    }
}
