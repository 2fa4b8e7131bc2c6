use std::sync::Arc;

use tracing::{debug, instrument};

use rankdb_core::error::{Error, Result};
use rankdb_core::traits::{embed_all, Embedder, SimilarityStore, SparseIndex};
use rankdb_core::types::{Meta, ScoredResult, Vector};

use crate::fusion::{rrf_scored, weighted_merge};

/// Combines a sparse index and a similarity store into one ranked list.
///
/// `alpha` weights the dense leg, `1 - alpha` the sparse leg. `alpha = 1`
/// is pure dense retrieval, `alpha = 0` pure sparse. The metadata filter
/// only applies to the dense leg; the sparse index carries no metadata.
pub struct HybridRetriever<S, V> where S: SparseIndex, V: SimilarityStore {
    sparse: S,
    store: V,
    embedder: Arc<dyn Embedder>,
    alpha: f32,
}

impl<S, V> HybridRetriever<S, V> where S: SparseIndex, V: SimilarityStore {
    /// `alpha` is clamped to [0, 1]; NaN falls back to 0.5.
    pub fn new(sparse: S, store: V, embedder: Arc<dyn Embedder>, alpha: f32) -> Self {
        let alpha = if alpha.is_nan() { 0.5 } else { alpha.clamp(0.0, 1.0) };
        Self { sparse, store, embedder, alpha }
    }

    pub fn alpha(&self) -> f32 { self.alpha }
    pub fn sparse(&self) -> &S { &self.sparse }
    pub fn sparse_mut(&mut self) -> &mut S { &mut self.sparse }
    pub fn store(&self) -> &V { &self.store }
    pub fn store_mut(&mut self) -> &mut V { &mut self.store }
    pub fn embedder(&self) -> &Arc<dyn Embedder> { &self.embedder }

    /// Weighted hybrid query over min–max normalized legs.
    #[instrument(skip(self, filter), fields(alpha = self.alpha))]
    pub fn query(&self, text: &str, k: usize, filter: Option<&Meta>) -> Result<Vec<ScoredResult>> {
        let (dense, sparse) = self.legs(text, k, filter)?;
        let mut merged = weighted_merge(&dense, &sparse, self.alpha);
        merged.truncate(k);
        Ok(self.hydrate(merged))
    }

    /// Hybrid query fusing the two legs with Reciprocal Rank Fusion instead of scores.
    #[instrument(skip(self, filter))]
    pub fn query_rrf(&self, text: &str, k: usize, filter: Option<&Meta>, k_param: f32) -> Result<Vec<ScoredResult>> {
        let (dense, sparse) = self.legs(text, k, filter)?;
        let mut fused = rrf_scored(&[dense.as_slice(), sparse.as_slice()], k_param, k);
        for r in &mut fused {
            r.metadata = dense.iter().find(|d| d.id == r.id).and_then(|d| d.metadata.clone());
        }
        Ok(self.hydrate(fused))
    }

    /// Fill `text` from the store's text lookup, where it has one.
    pub fn hydrate(&self, results: Vec<ScoredResult>) -> Vec<ScoredResult> {
        results
            .into_iter()
            .map(|mut r| {
                if r.text.is_none() { r.text = self.store.get_text(&r.id); }
                r
            })
            .collect()
    }

    pub fn embed_query(&self, text: &str) -> Result<Vector> {
        if text.trim().is_empty() { return Err(Error::EmptyQuery); }
        embed_all(self.embedder.as_ref(), &[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding(anyhow::anyhow!("embedder returned no vector for the query")))
    }

    fn legs(&self, text: &str, k: usize, filter: Option<&Meta>) -> Result<(Vec<ScoredResult>, Vec<ScoredResult>)> {
        let query_vec = self.embed_query(text)?;
        let dense = self.store.query(&query_vec, k, filter)?;
        let sparse = self.sparse.search(text, k)?;
        debug!(dense = dense.len(), sparse = sparse.len(), "retrieved legs");
        Ok((dense, sparse))
    }
}
