use std::collections::HashMap;

use tracing::{debug, instrument};

use rankdb_core::error::{Error, Result};
use rankdb_core::traits::SimilarityStore;
use rankdb_core::types::{sort_by_score_desc, Meta, ScoredResult, SourceKind, VectorRecord};

use crate::similarity::{cosine, matches_filter};

/// Brute-force cosine store. Records live in insertion order in one `Vec`;
/// `slots` maps fragment id to its position so upserts replace in place.
///
/// The dimensionality is fixed per instance, either up front via `with_dim`
/// or by the first upsert. Raw vectors are stored verbatim.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    dim: Option<usize>,
    entries: Vec<VectorRecord>,
    slots: HashMap<String, usize>,
}

impl InMemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_dim(dim: usize) -> Self { Self { dim: Some(dim), ..Self::default() } }

    pub fn dim(&self) -> Option<usize> { self.dim }

    pub fn get(&self, id: &str) -> Option<&VectorRecord> { self.slots.get(id).map(|&i| &self.entries[i]) }

    pub(crate) fn records(&self) -> &[VectorRecord] { &self.entries }

    fn check_dim(&self, id: &str, len: usize, expected: Option<usize>) -> Result<()> {
        if len == 0 {
            return Err(Error::InvalidInput(format!("vector for '{id}' is empty")));
        }
        match expected {
            Some(expected) if expected != len => Err(Error::DimensionMismatch { id: id.to_string(), expected, actual: len }),
            _ => Ok(()),
        }
    }
}

impl SimilarityStore for InMemoryStore {
    #[instrument(skip_all, fields(count = items.len()))]
    fn upsert(&mut self, items: Vec<VectorRecord>) -> Result<()> {
        // validate the whole batch before touching any entry
        let mut expected = self.dim;
        for item in &items {
            self.check_dim(&item.id, item.vector.len(), expected)?;
            expected.get_or_insert(item.vector.len());
        }
        self.dim = expected;
        let (mut inserted, mut replaced) = (0usize, 0usize);
        for item in items {
            match self.slots.get(&item.id) {
                Some(&slot) => { self.entries[slot] = item; replaced += 1; }
                None => {
                    self.slots.insert(item.id.clone(), self.entries.len());
                    self.entries.push(item);
                    inserted += 1;
                }
            }
        }
        debug!(inserted, replaced, total = self.entries.len(), "store upsert");
        Ok(())
    }

    fn query(&self, vector: &[f32], k: usize, filter: Option<&Meta>) -> Result<Vec<ScoredResult>> {
        self.check_dim("<query>", vector.len(), self.dim)?;
        let mut results: Vec<ScoredResult> = self
            .entries
            .iter()
            .filter(|e| filter.map_or(true, |f| matches_filter(e.metadata.as_ref(), f)))
            .map(|e| ScoredResult {
                id: e.id.clone(),
                score: cosine(vector, &e.vector),
                source: SourceKind::Dense,
                text: None,
                metadata: e.metadata.clone(),
            })
            .collect();
        sort_by_score_desc(&mut results);
        results.truncate(k);
        Ok(results)
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        let Some(slot) = self.slots.remove(id) else { return Ok(false) };
        self.entries.remove(slot);
        for s in self.slots.values_mut() { if *s > slot { *s -= 1; } }
        Ok(true)
    }

    fn len(&self) -> usize { self.entries.len() }

    fn get_text(&self, id: &str) -> Option<String> { self.get(id).map(|e| e.text.clone()) }
}
