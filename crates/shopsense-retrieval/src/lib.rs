//! # ShopSense Retrieval
//!
//! Semantic catalog retrieval: match free-form user text against a small,
//! dynamically-refreshed corpus of labeled catalog entries (categories,
//! products, promotions, greetings) by vector similarity.
//!
//! ## Architecture
//! ```text
//! CatalogSource (system of record)
//!   ↓ fetch_all
//! build_snapshot ── Embedder (batched) ──→ CorpusSnapshot
//!                                             ├── labels (ordered)
//!                                             ├── kind / reply tables
//!                                             └── FlatIndex (unit vectors)
//!   ↓ atomic publish
//! SemanticMatcher
//!   ├── find_matches(text)        → threshold + top-k ranked MatchResults
//!   ├── find_top(text, k)         → (key, similarity) pairs, no filter
//!   ├── is_greeting(text)         → fixed-token classifier
//!   └── refresh()                 → rebuild + swap, readers undisturbed
//! ```
//!
//! The corpus is a few hundred to a few thousand short strings, so the index
//! is exact brute-force search; there is no ANN structure to maintain.

pub mod corpus;
pub mod index;
pub mod matcher;
pub mod source;

#[cfg(test)]
pub(crate) mod testutil;

pub use corpus::{CorpusSnapshot, build_snapshot};
pub use index::{FlatIndex, l2_normalize, squared_l2};
pub use matcher::{SemanticMatcher, is_greeting};
pub use source::MemoryCatalog;
