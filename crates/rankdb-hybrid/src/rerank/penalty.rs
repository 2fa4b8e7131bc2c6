use rankdb_core::error::Result;
use rankdb_core::traits::Reranker;
use rankdb_core::types::{sort_by_score_desc, ScoredResult};

/// Rescores each candidate as `score - length_penalty * sqrt(chars)` and
/// re-sorts. Never adds or drops candidates beyond the `top_k` cut.
#[derive(Debug, Clone, Copy, Default)]
pub struct PenaltyReranker {
    length_penalty: f32,
}

impl PenaltyReranker {
    pub fn new(length_penalty: f32) -> Self { Self { length_penalty } }
}

impl Reranker for PenaltyReranker {
    fn rerank(&self, _query: &str, results: Vec<ScoredResult>, top_k: usize) -> Result<Vec<ScoredResult>> {
        let mut rescored: Vec<ScoredResult> = results
            .into_iter()
            .map(|mut r| {
                let len = r.text.as_deref().map_or(0, |t| t.chars().count());
                r.score -= self.length_penalty * (len as f32).sqrt();
                r
            })
            .collect();
        sort_by_score_desc(&mut rescored);
        rescored.truncate(top_k);
        Ok(rescored)
    }
}
