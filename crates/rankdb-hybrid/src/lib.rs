//! rankdb-hybrid
//!
//! Rank fusion, the hybrid retriever, query transformers (PRF, HyDE),
//! rerankers and the `Engine` that wires ingestion and retrieval together.

pub mod engine;
pub mod fusion;
pub mod hyde;
pub mod prf;
pub mod rerank;
pub mod retriever;

pub use engine::{Engine, EngineOptions, IngestReport};
pub use fusion::{min_max_normalize, reciprocal_rank_fusion, rrf_scored, weighted_merge, DEFAULT_RRF_K};
pub use hyde::{hyde_query, TemplateGenerator};
pub use prf::PseudoRelevanceFeedback;
pub use rerank::{reranker_from_settings, MmrReranker, PenaltyReranker};
pub use retriever::HybridRetriever;
