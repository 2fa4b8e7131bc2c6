//! Composition layer: ingestion (segment, enrich, embed, index) and retrieval
//! (hybrid retriever, then an optional reranker).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use rankdb_core::config::{FusionMode, Settings};
use rankdb_core::enrich::{dedupe_by_hash, enrich_fragments};
use rankdb_core::error::Result;
use rankdb_core::segment::segmenter_from_settings;
use rankdb_core::traits::{embed_all, Embedder, Reranker, Segmenter, SimilarityStore, SparseIndex, TextGenerator};
use rankdb_core::types::{Document, Fragment, Meta, ScoredResult, VectorRecord};
use rankdb_embed::get_default_embedder;
use rankdb_text::Bm25Index;
use rankdb_vector::InMemoryStore;

use crate::fusion::DEFAULT_RRF_K;
use crate::hyde::{hyde_query, TemplateGenerator};
use crate::prf::PseudoRelevanceFeedback;
use crate::rerank::reranker_from_settings;
use crate::retriever::HybridRetriever;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Candidates fetched before reranking = `k * candidate_multiplier`.
    pub candidate_multiplier: usize,
    pub fusion: FusionMode,
    pub rrf_k: f32,
    /// Drop fragments whose text hash was already seen in the same ingest call.
    pub dedupe: bool,
}

impl Default for EngineOptions {
    fn default() -> Self { Self { candidate_multiplier: 2, fusion: FusionMode::Weighted, rrf_k: DEFAULT_RRF_K, dedupe: true } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    /// Fragments written to both indices.
    pub fragments: usize,
    /// Fragments dropped because an earlier fragment in the call had the same text.
    pub duplicates: usize,
    /// Fragments replaced by a later fragment with the same id in the same call.
    pub superseded: usize,
}

pub struct Engine<S, V> where S: SparseIndex, V: SimilarityStore {
    segmenter: Box<dyn Segmenter>,
    retriever: HybridRetriever<S, V>,
    reranker: Option<Box<dyn Reranker>>,
    expander: PseudoRelevanceFeedback,
    generator: Box<dyn TextGenerator>,
    options: EngineOptions,
}

impl<S, V> Engine<S, V> where S: SparseIndex, V: SimilarityStore {
    pub fn new(segmenter: Box<dyn Segmenter>, retriever: HybridRetriever<S, V>, options: EngineOptions) -> Self {
        Self {
            segmenter,
            retriever,
            reranker: None,
            expander: PseudoRelevanceFeedback::default(),
            generator: Box::new(TemplateGenerator),
            options,
        }
    }

    pub fn with_reranker(mut self, reranker: Box<dyn Reranker>) -> Self { self.reranker = Some(reranker); self }
    pub fn with_expander(mut self, expander: PseudoRelevanceFeedback) -> Self { self.expander = expander; self }
    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self { self.generator = generator; self }

    pub fn retriever(&self) -> &HybridRetriever<S, V> { &self.retriever }
    pub fn options(&self) -> &EngineOptions { &self.options }

    /// Segment, enrich and index `docs`. All fragment texts are embedded in a
    /// single call. Fragments whose id is already indexed are replaced.
    ///
    /// Within one call the last fragment for an id wins, matching the store's
    /// upsert. A fragment dropped as a content duplicate is also removed from
    /// both indices, so no stale version of its id stays searchable.
    #[instrument(skip_all, fields(documents = docs.len()))]
    pub fn ingest(&mut self, docs: &[Document]) -> Result<IngestReport> {
        let mut fragments: Vec<Fragment> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut superseded = 0;
        for doc in docs {
            for f in self.segmenter.segment(doc)? {
                match slots.get(&f.id) {
                    Some(&slot) => { fragments[slot] = f; superseded += 1; }
                    None => { slots.insert(f.id.clone(), fragments.len()); fragments.push(f); }
                }
            }
        }
        if superseded > 0 { warn!(superseded, "fragment ids repeated within one ingest call, keeping the last"); }

        let mut fragments = enrich_fragments(fragments);
        let mut dropped: Vec<String> = Vec::new();
        if self.options.dedupe {
            let ids: Vec<String> = fragments.iter().map(|f| f.id.clone()).collect();
            fragments = dedupe_by_hash(fragments);
            let kept: HashSet<&str> = fragments.iter().map(|f| f.id.as_str()).collect();
            dropped = ids.into_iter().filter(|id| !kept.contains(id.as_str())).collect();
        }
        let report = IngestReport { documents: docs.len(), fragments: fragments.len(), duplicates: dropped.len(), superseded };
        if fragments.is_empty() { return Ok(report); }

        let texts: Vec<String> = fragments.iter().map(|f| f.text.clone()).collect();
        let vectors = embed_all(self.retriever.embedder().as_ref(), &texts)?;
        let records: Vec<VectorRecord> = fragments
            .iter()
            .zip(vectors)
            .map(|(f, vector)| VectorRecord { id: f.id.clone(), text: f.text.clone(), vector, metadata: Some(f.metadata.clone()) })
            .collect();
        self.retriever.store_mut().upsert(records)?;
        for id in &dropped { self.retriever.store_mut().remove(id)?; }

        let sparse = self.retriever.sparse_mut();
        for id in fragments.iter().map(|f| &f.id).chain(&dropped) { sparse.remove(id)?; }
        sparse.add(&fragments)?;
        info!(
            documents = report.documents,
            fragments = report.fragments,
            duplicates = report.duplicates,
            superseded = report.superseded,
            "ingest complete"
        );
        Ok(report)
    }

    /// Fetch `k * candidate_multiplier` hybrid candidates, then rerank or cut to `k`.
    #[instrument(skip(self, filter))]
    pub fn retrieve(&self, query: &str, k: usize, filter: Option<&Meta>) -> Result<Vec<ScoredResult>> {
        let candidates = k.saturating_mul(self.options.candidate_multiplier.max(1));
        let mut results = match self.options.fusion {
            FusionMode::Weighted => self.retriever.query(query, candidates, filter)?,
            FusionMode::Rrf => self.retriever.query_rrf(query, candidates, filter, self.options.rrf_k)?,
        };
        match &self.reranker {
            Some(reranker) => reranker.rerank(query, results, k),
            None => { results.truncate(k); Ok(results) }
        }
    }

    /// Expand the query with pseudo-relevance feedback, then `retrieve`.
    pub fn retrieve_expanded(&self, query: &str, k: usize, filter: Option<&Meta>) -> Result<Vec<ScoredResult>> {
        let expanded = self.expander.expand(
            query,
            |q, n| self.retriever.query(q, n, filter),
            |id| self.retriever.store().get_text(id),
        )?;
        info!(original = query, expanded = %expanded, "expanded query");
        self.retrieve(&expanded, k, filter)
    }

    /// Dense-only retrieval with the embedding of a generated answer passage.
    pub fn retrieve_hyde(&self, query: &str, k: usize, filter: Option<&Meta>) -> Result<Vec<ScoredResult>> {
        let results = hyde_query(
            self.generator.as_ref(),
            self.retriever.embedder().as_ref(),
            self.retriever.store(),
            query,
            k,
            filter,
        )?;
        Ok(self.retriever.hydrate(results))
    }
}

impl Engine<Bm25Index, InMemoryStore> {
    /// Default wiring: configured segmenter, BM25 index, in-memory store, hashing embedder.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = get_default_embedder(&settings.embed).map_err(rankdb_core::Error::Embedding)?;
        Self::from_settings_with_embedder(settings, embedder)
    }

    pub fn from_settings_with_embedder(settings: &Settings, embedder: Arc<dyn Embedder>) -> Result<Self> {
        settings.validate()?;
        let segmenter = segmenter_from_settings(&settings.segment)?;
        let store = InMemoryStore::with_dim(embedder.dim());
        let retriever = HybridRetriever::new(Bm25Index::new(), store, embedder.clone(), settings.retrieval.alpha);
        let options = EngineOptions {
            candidate_multiplier: settings.retrieval.candidate_multiplier,
            fusion: settings.retrieval.fusion,
            rrf_k: settings.retrieval.rrf_k,
            dedupe: true,
        };
        let mut engine = Engine::new(segmenter, retriever, options)
            .with_expander(PseudoRelevanceFeedback::from_settings(&settings.expansion));
        if let Some(reranker) = reranker_from_settings(&settings.rerank, embedder) {
            engine = engine.with_reranker(reranker);
        }
        Ok(engine)
    }
}
