//! Score fusion for ranked lists.
//!
//! Two strategies:
//! - min–max normalization followed by an `alpha`-weighted sum (the hybrid retriever's default)
//! - Reciprocal Rank Fusion, which ignores raw scores: `score(id) = Σ 1 / (k + rank)`

use std::collections::HashMap;

use rankdb_core::types::{sort_by_score_desc, ScoredResult, SourceKind};

pub const DEFAULT_RRF_K: f32 = 60.0;

/// Rescale scores to [0, 1] with `(s - min) / (max - min)`.
/// A list whose scores are all equal maps every score to 1.
pub fn min_max_normalize(results: &[ScoredResult]) -> Vec<ScoredResult> {
    let Some(first) = results.first() else { return vec![] };
    let (min, max) = results.iter().fold((first.score, first.score), |(lo, hi), r| (lo.min(r.score), hi.max(r.score)));
    let range = max - min;
    results
        .iter()
        .map(|r| {
            let score = if range > 0.0 { (r.score - min) / range } else { 1.0 };
            ScoredResult { score, ..r.clone() }
        })
        .collect()
}

/// Merge a dense and a sparse list by id: `alpha * dense + (1 - alpha) * sparse`
/// over normalized scores. An id missing from one leg gets 0 for that leg.
///
/// Ids are collected from the heavier leg first (dense when `alpha >= 0.5`),
/// and the stable sort keeps that order among equal combined scores.
pub fn weighted_merge(dense: &[ScoredResult], sparse: &[ScoredResult], alpha: f32) -> Vec<ScoredResult> {
    let dense = min_max_normalize(dense);
    let sparse = min_max_normalize(sparse);
    let legs = if alpha >= 0.5 { [(&dense, alpha), (&sparse, 1.0 - alpha)] } else { [(&sparse, 1.0 - alpha), (&dense, alpha)] };

    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<ScoredResult> = Vec::with_capacity(dense.len() + sparse.len());
    for (leg, weight) in legs {
        for r in leg.iter() {
            let contribution = weight * r.score;
            match slots.get(&r.id) {
                Some(&slot) => {
                    let entry = &mut merged[slot];
                    entry.score += contribution;
                    if entry.metadata.is_none() { entry.metadata = r.metadata.clone(); }
                }
                None => {
                    slots.insert(r.id.clone(), merged.len());
                    merged.push(ScoredResult {
                        id: r.id.clone(),
                        score: contribution,
                        source: SourceKind::Hybrid,
                        text: None,
                        metadata: r.metadata.clone(),
                    });
                }
            }
        }
    }
    sort_by_score_desc(&mut merged);
    merged
}

/// Reciprocal Rank Fusion over lists of ids (rank is the 1-based position).
/// Ids absent from a list get nothing from it. Equal fused scores keep the
/// order in which ids were first seen.
pub fn reciprocal_rank_fusion<S: AsRef<str>>(lists: &[Vec<S>], k_param: f32, top_k: usize) -> Vec<ScoredResult> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut fused: Vec<ScoredResult> = Vec::new();
    for list in lists {
        for (i, id) in list.iter().enumerate() {
            let id = id.as_ref();
            let contribution = 1.0 / (k_param + (i + 1) as f32);
            let slot = *slots.entry(id).or_insert_with(|| {
                fused.push(ScoredResult::new(id, 0.0, SourceKind::Fused));
                fused.len() - 1
            });
            fused[slot].score += contribution;
        }
    }
    sort_by_score_desc(&mut fused);
    fused.truncate(top_k);
    fused
}

/// RRF over already scored lists, keeping each list's order as its ranking.
pub fn rrf_scored(lists: &[&[ScoredResult]], k_param: f32, top_k: usize) -> Vec<ScoredResult> {
    let ids: Vec<Vec<&str>> = lists.iter().map(|l| l.iter().map(|r| r.id.as_str()).collect()).collect();
    reciprocal_rank_fusion(&ids, k_param, top_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(pairs: &[(&str, f32)]) -> Vec<ScoredResult> {
        pairs.iter().map(|(id, s)| ScoredResult::new(*id, *s, SourceKind::Sparse)).collect()
    }

    #[test]
    fn normalize_spans_unit_interval() {
        let out = min_max_normalize(&scored(&[("a", 4.0), ("b", 2.0), ("c", 3.0)]));
        let scores: Vec<f32> = out.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![1.0, 0.0, 0.5]);
        assert!(min_max_normalize(&[]).is_empty());
    }

    #[test]
    fn weighted_merge_sums_shared_ids() {
        let dense = scored(&[("a", 0.9), ("b", 0.1)]);
        let sparse = scored(&[("b", 5.0), ("c", 1.0)]);
        let merged = weighted_merge(&dense, &sparse, 0.5);
        let get = |id: &str| merged.iter().find(|r| r.id == id).map(|r| r.score);
        assert_eq!(get("a"), Some(0.5));
        assert_eq!(get("b"), Some(0.5));
        assert_eq!(get("c"), Some(0.0));
        assert_eq!(merged[0].id, "a", "dense leg is collected first on ties at alpha 0.5");
        assert!(merged.iter().all(|r| r.source == SourceKind::Hybrid));
    }
}
