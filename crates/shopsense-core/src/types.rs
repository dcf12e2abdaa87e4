//! Catalog and match types shared across the ShopSense crates.

use serde::{Deserialize, Serialize};

/// The closed set of catalog entry kinds the engine indexes.
///
/// Adding a kind is a compile-time-visible change: every extraction and
/// dispatch site matches exhaustively on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Category,
    Product,
    Promotion,
    Greeting,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Category => "category",
            ItemKind::Product => "product",
            ItemKind::Promotion => "promotion",
            ItemKind::Greeting => "greeting",
        }
    }
}

/// One raw row from the system of record, before extraction.
///
/// The source stores promotions under `title`/`details` and everything else
/// under `name`/`msg_reply`; all four fields travel here and the kind decides
/// which pair applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub kind: ItemKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub msg_reply: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl CatalogRecord {
    /// Convenience constructor for the common `name`/`msg_reply` kinds.
    pub fn named(kind: ItemKind, name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            msg_reply: Some(reply.into()),
            title: None,
            details: None,
        }
    }

    /// Convenience constructor for promotions (`title`/`details`).
    pub fn promotion(title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Promotion,
            name: None,
            msg_reply: None,
            title: Some(title.into()),
            details: Some(details.into()),
        }
    }

    /// Apply the per-kind extraction rule.
    ///
    /// Promotions take their label from `title` and their payload from
    /// `details`; every other kind uses `name`/`msg_reply`. A record with a
    /// missing or empty label or payload for its kind yields `None`; the
    /// loader skips such rows silently rather than failing the load.
    pub fn into_item(self) -> Option<CorpusItem> {
        let kind = self.kind;
        let (key, payload) = match kind {
            ItemKind::Promotion => (self.title, self.details),
            ItemKind::Category | ItemKind::Product | ItemKind::Greeting => {
                (self.name, self.msg_reply)
            }
        };
        match (key, payload) {
            (Some(key), Some(payload)) if !key.is_empty() && !payload.is_empty() => {
                Some(CorpusItem { key, kind, payload })
            }
            _ => None,
        }
    }
}

/// One indexed catalog entry after extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusItem {
    /// Human-readable label; doubles as the text that gets embedded.
    pub key: String,
    pub kind: ItemKind,
    /// Reply text or structured detail to surface on a match.
    pub payload: String,
}

/// One ranked answer from the resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub key: String,
    /// 1 − squared L2 distance over unit vectors; conceptually in [-1, 1].
    pub similarity: f32,
    pub payload: String,
}
