//! In-memory inverted index scored with BM25.
//!
//! For each query term present in the index every posting fragment receives
//!
//! ```text
//! idf * tf * (k1 + 1) / (tf + k1 * (1 - b + b * len / avg_len))
//! idf = ln((N - df + 0.5) / (df + 0.5) + 1)
//! ```
//!
//! Results are sorted by descending score; equal scores keep the order in which
//! fragments were first reached while scanning the query's postings.
//!
//! The index is append-only: `add` with an id already present indexes it
//! again. Use `remove` first to replace a fragment. Not synchronized; callers
//! serialize writers.

use std::collections::HashMap;

use tracing::{debug, instrument};

use rankdb_core::error::Result;
use rankdb_core::traits::SparseIndex;
use rankdb_core::types::{sort_by_score_desc, Fragment, FragmentId, ScoredResult, SourceKind};

use crate::analyzer::Analyzer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
	pub k1: f32,
	pub b: f32,
}

impl Default for Bm25Params {
	fn default() -> Self { Self { k1: 1.5, b: 0.75 } }
}

#[derive(Debug, Clone)]
struct Posting {
	fragment_id: FragmentId,
	term_frequency: u32,
	fragment_length: u32,
}

#[derive(Debug, Clone)]
struct FragmentStats {
	id: FragmentId,
	length: usize,
}

#[derive(Clone, Default)]
pub struct Bm25Index {
	analyzer: Analyzer,
	params: Bm25Params,
	postings: HashMap<String, Vec<Posting>>,
	fragments: Vec<FragmentStats>,
	total_length: usize,
	avg_length: f32,
}

impl Bm25Index {
	pub fn new() -> Self { Self::default() }

	pub fn with_params(params: Bm25Params) -> Self { Self { params, ..Self::default() } }

	pub fn with_analyzer(analyzer: Analyzer) -> Self { Self { analyzer, ..Self::default() } }

	pub fn analyzer(&self) -> &Analyzer { &self.analyzer }

	/// Mean token count over all indexed fragments, 0 when empty.
	pub fn avg_length(&self) -> f32 { self.avg_length }

	/// Number of fragments containing `term` (already analyzed form).
	pub fn doc_freq(&self, term: &str) -> usize { self.postings.get(term).map_or(0, Vec::len) }

	fn recompute_stats(&mut self) {
		self.total_length = self.fragments.iter().map(|f| f.length).sum();
		self.avg_length = if self.fragments.is_empty() { 0.0 } else { self.total_length as f32 / self.fragments.len() as f32 };
	}

	fn index_fragment(&mut self, fragment: &Fragment) {
		let tokens = self.analyzer.tokenize(&fragment.text);
		let length = tokens.len();
		let mut freqs: HashMap<String, u32> = HashMap::new();
		for t in tokens { *freqs.entry(t).or_default() += 1; }
		for (term, tf) in freqs {
			self.postings.entry(term).or_default().push(Posting {
				fragment_id: fragment.id.clone(),
				term_frequency: tf,
				fragment_length: u32::try_from(length).unwrap_or(u32::MAX),
			});
		}
		self.fragments.push(FragmentStats { id: fragment.id.clone(), length });
	}
}

impl SparseIndex for Bm25Index {
	#[instrument(skip_all, fields(count = fragments.len()))]
	fn add(&mut self, fragments: &[Fragment]) -> Result<()> {
		for f in fragments { self.index_fragment(f); }
		self.recompute_stats();
		debug!(total = self.fragments.len(), avg_length = self.avg_length, terms = self.postings.len(), "bm25 add");
		Ok(())
	}

	fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredResult>> {
		let terms = self.analyzer.tokenize(query);
		if terms.is_empty() || self.fragments.is_empty() || k == 0 { return Ok(vec![]); }
		let n = self.fragments.len() as f32;
		let avg_length = if self.avg_length > 0.0 { self.avg_length } else { 1.0 };
		let Bm25Params { k1, b } = self.params;

		let mut slots: HashMap<&str, usize> = HashMap::new();
		let mut results: Vec<ScoredResult> = Vec::new();
		for term in &terms {
			let Some(postings) = self.postings.get(term) else { continue };
			let df = postings.len() as f32;
			let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
			for p in postings {
				let tf = p.term_frequency as f32;
				let norm = 1.0 - b + b * p.fragment_length as f32 / avg_length;
				let contribution = idf * tf * (k1 + 1.0) / (tf + k1 * norm);
				let slot = *slots.entry(p.fragment_id.as_str()).or_insert_with(|| {
					results.push(ScoredResult::new(p.fragment_id.clone(), 0.0, SourceKind::Sparse));
					results.len() - 1
				});
				results[slot].score += contribution;
			}
		}
		sort_by_score_desc(&mut results);
		results.truncate(k);
		Ok(results)
	}

	fn remove(&mut self, id: &str) -> Result<bool> {
		let before = self.fragments.len();
		self.fragments.retain(|f| f.id != id);
		if self.fragments.len() == before { return Ok(false); }
		for postings in self.postings.values_mut() { postings.retain(|p| p.fragment_id != id); }
		self.postings.retain(|_, postings| !postings.is_empty());
		self.recompute_stats();
		debug!(id, remaining = self.fragments.len(), "bm25 remove");
		Ok(true)
	}

	fn len(&self) -> usize { self.fragments.len() }
}
