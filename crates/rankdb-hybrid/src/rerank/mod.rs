//! Rerankers operating on an already retrieved candidate list.

pub mod mmr;
pub mod penalty;

use std::sync::Arc;

use rankdb_core::config::{RerankSettings, RerankerKind};
use rankdb_core::traits::{Embedder, Reranker};

pub use mmr::MmrReranker;
pub use penalty::PenaltyReranker;

pub fn reranker_from_settings(settings: &RerankSettings, embedder: Arc<dyn Embedder>) -> Option<Box<dyn Reranker>> {
    match settings.kind {
        RerankerKind::None => None,
        RerankerKind::Penalty => Some(Box::new(PenaltyReranker::new(settings.length_penalty))),
        RerankerKind::Mmr => Some(Box::new(MmrReranker::new(embedder, settings.mmr_lambda))),
    }
}
