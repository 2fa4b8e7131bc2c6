//! Rank-quality metrics for consumers of ranked result lists.

use std::collections::HashSet;

fn hits_in_top<S: AsRef<str>>(ranked: &[S], relevant: &HashSet<String>, k: usize) -> (usize, usize) {
    let top = &ranked[..k.min(ranked.len())];
    (top.iter().filter(|id| relevant.contains(id.as_ref())).count(), top.len())
}

/// Fraction of the top `k` that is relevant. Zero when nothing was retrieved.
pub fn precision_at_k<S: AsRef<str>>(ranked: &[S], relevant: &HashSet<String>, k: usize) -> f64 {
    let (hits, considered) = hits_in_top(ranked, relevant, k);
    if considered == 0 { 0.0 } else { hits as f64 / considered as f64 }
}

/// Fraction of the relevant set found in the top `k`. Zero for an empty relevant set.
pub fn recall_at_k<S: AsRef<str>>(ranked: &[S], relevant: &HashSet<String>, k: usize) -> f64 {
    if relevant.is_empty() { return 0.0; }
    let (hits, _) = hits_in_top(ranked, relevant, k);
    hits as f64 / relevant.len() as f64
}

/// Reciprocal of the 1-based rank of the first relevant id within the top `k`.
pub fn mrr_at_k<S: AsRef<str>>(ranked: &[S], relevant: &HashSet<String>, k: usize) -> f64 {
    ranked
        .iter()
        .take(k)
        .position(|id| relevant.contains(id.as_ref()))
        .map_or(0.0, |i| 1.0 / (i + 1) as f64)
}

pub fn macro_average(values: &[f64]) -> f64 {
    if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 }
}
