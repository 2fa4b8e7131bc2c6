//! rankdb-text
//!
//! Lexical side of rankdb: the tantivy-backed analyzer and an in-memory BM25
//! sparse index implementing `rankdb_core::traits::SparseIndex`.

pub mod analyzer;
pub mod bm25;

pub use analyzer::{Analyzer, STOP_WORDS};
pub use bm25::{Bm25Index, Bm25Params};
