//! Pseudo-relevance feedback query expansion.
//!
//! Runs an initial search, counts analyzed terms across the top documents and
//! appends the most frequent ones that the query does not already contain.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use rankdb_core::config::ExpansionSettings;
use rankdb_core::error::Result;
use rankdb_core::types::ScoredResult;
use rankdb_text::Analyzer;

#[derive(Clone)]
pub struct PseudoRelevanceFeedback {
    analyzer: Analyzer,
    top_docs: usize,
    top_terms: usize,
}

impl PseudoRelevanceFeedback {
    /// Both counts are raised to at least 1.
    pub fn new(top_docs: usize, top_terms: usize) -> Self {
        Self { analyzer: Analyzer::new(), top_docs: top_docs.max(1), top_terms: top_terms.max(1) }
    }

    pub fn from_settings(settings: &ExpansionSettings) -> Self { Self::new(settings.prf_top_docs, settings.prf_top_terms) }

    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self { self.analyzer = analyzer; self }

    /// Expand `original` using `search` for the feedback documents. Result text
    /// comes from the result itself or, when absent, from `get_text`.
    ///
    /// Returns `original` unchanged when no feedback term is new; otherwise the
    /// analyzed query terms followed by the new terms, space separated.
    pub fn expand<F, G>(&self, original: &str, search: F, get_text: G) -> Result<String>
    where
        F: FnOnce(&str, usize) -> Result<Vec<ScoredResult>>,
        G: Fn(&str) -> Option<String>,
    {
        let feedback = search(original, self.top_docs)?;

        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();
        for r in &feedback {
            let text = r.text.clone().or_else(|| get_text(&r.id)).unwrap_or_default();
            for term in self.analyzer.tokenize(&text) {
                match slots.get(&term) {
                    Some(&slot) => counts[slot].1 += 1,
                    None => { slots.insert(term.clone(), counts.len()); counts.push((term, 1)); }
                }
            }
        }
        // stable: equal counts keep first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let query_terms = self.analyzer.tokenize(original);
        let present: HashSet<&str> = query_terms.iter().map(String::as_str).collect();
        let new_terms: Vec<&str> = counts
            .iter()
            .take(self.top_terms)
            .map(|(t, _)| t.as_str())
            .filter(|t| !present.contains(t))
            .collect();
        if new_terms.is_empty() { return Ok(original.to_string()); }

        let mut seen = HashSet::new();
        let expanded: Vec<&str> = query_terms.iter().map(String::as_str).chain(new_terms).filter(|t| seen.insert(*t)).collect();
        let expanded = expanded.join(" ");
        debug!(original, expanded = %expanded, feedback = feedback.len(), "prf expansion");
        Ok(expanded)
    }
}

impl Default for PseudoRelevanceFeedback {
    fn default() -> Self { Self::new(5, 5) }
}
