//! rankdb-core
//!
//! Shared data model, capability traits, error taxonomy and configuration for
//! the rankdb retrieval crates, plus the ingestion-side collaborators
//! (directory loading, segmentation, enrichment) and evaluation metrics.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod data_processor;
pub mod enrich;
pub mod error;
pub mod eval;
pub mod segment;
pub mod traits;
pub mod types;

pub use error::{Error, Result, Stage};
pub use types::{Document, Fragment, FragmentId, Meta, ScoredResult, SourceKind, Vector, VectorRecord};
