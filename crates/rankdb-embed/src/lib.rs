//! rankdb-embed
//!
//! Deterministic feature-hashing embedder. Each lower-cased alphanumeric token
//! is hashed with XxHash64 into one of `dim` buckets, counts are accumulated
//! and the vector is L2-normalized. Texts sharing words get similar vectors,
//! which is enough for tests and offline demos. Model-backed embedders plug in
//! behind the same `rankdb_core::traits::Embedder` trait.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::{ensure, Result};
use rankdb_core::config::EmbedSettings;
use rankdb_core::traits::Embedder;
use rankdb_core::types::Vector;
use twox_hash::XxHash64;

#[derive(Debug, Clone)]
pub struct HashingEmbedder { dim: usize, seed: u64 }

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        ensure!(dim > 0, "embedding dimension must be at least 1");
        Ok(Self { dim, seed: 0 })
    }

    pub fn with_seed(mut self, seed: u64) -> Self { self.seed = seed; self }

    pub fn embed_text(&self, text: &str) -> Vector {
        let mut v = vec![0f32; self.dim];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(self.seed);
            token.hash(&mut hasher);
            let idx = (hasher.finish() % self.dim as u64) as usize;
            v[idx] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

pub fn get_default_embedder(settings: &EmbedSettings) -> Result<Arc<dyn Embedder>> {
    tracing::debug!(dim = settings.dim, seed = settings.seed, "using hashing embedder");
    Ok(Arc::new(HashingEmbedder::new(settings.dim)?.with_seed(settings.seed)))
}
