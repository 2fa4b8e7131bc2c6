use std::sync::Arc;

use tracing::debug;

use rankdb_core::error::{Error, Result};
use rankdb_core::traits::{embed_all, Embedder, Reranker};
use rankdb_core::types::ScoredResult;
use rankdb_vector::cosine;

/// Maximal Marginal Relevance.
///
/// Greedily picks the candidate maximizing
/// `lambda * sim(query, c) - (1 - lambda) * max sim(c, selected)` until
/// `top_k` are chosen, and returns them in selection order. Lists that already
/// fit in `top_k` are returned untouched.
pub struct MmrReranker {
    embedder: Arc<dyn Embedder>,
    lambda: f32,
}

impl MmrReranker {
    /// `lambda` is clamped to [0, 1]; near 1 favors relevance, near 0 spread.
    pub fn new(embedder: Arc<dyn Embedder>, lambda: f32) -> Self {
        let lambda = if lambda.is_nan() { 0.5 } else { lambda.clamp(0.0, 1.0) };
        Self { embedder, lambda }
    }

    pub fn lambda(&self) -> f32 { self.lambda }
}

impl Reranker for MmrReranker {
    fn rerank(&self, query: &str, results: Vec<ScoredResult>, top_k: usize) -> Result<Vec<ScoredResult>> {
        if results.len() <= top_k { return Ok(results); }

        // query and every candidate in one embedding call
        let mut texts = Vec::with_capacity(results.len() + 1);
        texts.push(query.to_string());
        texts.extend(results.iter().map(|r| r.text.clone().unwrap_or_default()));
        let mut vectors = embed_all(self.embedder.as_ref(), &texts)?;
        let candidates = vectors.split_off(1);
        let query_vec = &vectors[0];
        if let Some((i, c)) = candidates.iter().enumerate().find(|(_, c)| c.len() != query_vec.len()) {
            return Err(Error::Reranking(format!(
                "candidate '{}' embedded to {} dimensions, query to {}",
                results[i].id,
                c.len(),
                query_vec.len()
            )));
        }

        let relevance: Vec<f32> = candidates.iter().map(|c| cosine(query_vec, c)).collect();
        let mut selected: Vec<usize> = Vec::with_capacity(top_k);
        let mut remaining: Vec<usize> = (0..results.len()).collect();
        while selected.len() < top_k && !remaining.is_empty() {
            let mut best: Option<(usize, f32)> = None;
            for (pos, &i) in remaining.iter().enumerate() {
                let redundancy = selected.iter().map(|&j| cosine(&candidates[i], &candidates[j])).fold(0.0f32, f32::max);
                let score = self.lambda * relevance[i] - (1.0 - self.lambda) * redundancy;
                if best.map_or(true, |(_, s)| score > s) { best = Some((pos, score)); }
            }
            let Some((pos, _)) = best else { break };
            selected.push(remaining.remove(pos));
        }
        debug!(candidates = results.len(), selected = selected.len(), lambda = self.lambda, "mmr rerank");

        let mut slots: Vec<Option<ScoredResult>> = results.into_iter().map(Some).collect();
        Ok(selected.into_iter().filter_map(|i| slots[i].take()).collect())
    }
}
