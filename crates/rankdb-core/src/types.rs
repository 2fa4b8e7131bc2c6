//! Domain types shared by the sparse index, the similarity store and the rankers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type FragmentId = String;
pub type Meta = HashMap<String, serde_json::Value>;
pub type Vector = Vec<f32>;

/// A source document before segmentation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Meta,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: Meta::new() }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A fragment of a source document that is independently indexed.
///
/// - `id`: globally unique fragment identifier, the join key between the
///   sparse index, the similarity store and reranker text lookups
/// - `source_id`: identity of the originating document (not unique)
/// - `text`: the text payload
/// - `metadata`: auxiliary attributes used by store filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: FragmentId,
    pub source_id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Meta,
}

impl Fragment {
    pub fn new(id: impl Into<String>, source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), source_id: source_id.into(), text: text.into(), metadata: Meta::new() }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// One entry handed to a similarity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: FragmentId,
    pub text: String,
    pub vector: Vector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Meta>,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, vector: Vector) -> Self {
        Self { id: id.into(), text: text.into(), vector, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: Meta) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Indicates which stage produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Sparse,
    Dense,
    Hybrid,
    Fused,
}

/// The minimal surface returned by every ranking stage.
///
/// `id` matches `Fragment::id`. `score` is stage-specific but higher is
/// always better; it has no fixed range unless a stage normalizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub id: FragmentId,
    pub score: f32,
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Meta>,
}

impl ScoredResult {
    pub fn new(id: impl Into<String>, score: f32, source: SourceKind) -> Self {
        Self { id: id.into(), score, source, text: None, metadata: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Sort by descending score. Stable, so equal scores keep their incoming order.
pub fn sort_by_score_desc(results: &mut [ScoredResult]) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}
