use proptest::prelude::*;

use rankdb_core::traits::SparseIndex;
use rankdb_core::types::Fragment;
use rankdb_text::{Analyzer, Bm25Index};

fn frag(id: &str, text: &str) -> Fragment { Fragment::new(id, "src", text) }

#[test]
fn bm25_ranks_lexical_match_first() {
    let mut index = Bm25Index::new();
    index.add(&[frag("d1", "BM25 search ranking"), frag("d2", "vector similarity cosine")]).expect("add");

    let results = index.search("bm25 ranking", 2).expect("search");
    assert!(!results.is_empty());
    assert_eq!(results[0].id, "d1");
    assert!(results[0].score > 0.0);
    assert!(results.iter().all(|r| r.id != "d2"), "d2 shares no term with the query");
}

#[test]
fn bm25_single_term_score_matches_formula() {
    let mut index = Bm25Index::new();
    index.add(&[frag("only", "alpha beta")]).expect("add");
    let results = index.search("alpha", 5).expect("search");
    let idf = ((1.0f32 - 1.0 + 0.5) / (1.0 + 0.5) + 1.0).ln();
    assert_eq!(results.len(), 1);
    assert!((results[0].score - idf).abs() < 1e-6, "len == avg so the tf part is 1");
}

#[test]
fn bm25_degenerate_inputs_are_empty_not_errors() {
    let empty = Bm25Index::new();
    assert!(empty.search("anything", 3).expect("search").is_empty());

    let mut index = Bm25Index::new();
    index.add(&[frag("a", "rust crates")]).expect("add");
    assert!(index.search("", 3).expect("search").is_empty());
    assert!(index.search("the and of", 3).expect("search").is_empty());
    assert!(index.search("python", 3).expect("search").is_empty());
    assert!(index.search("rust", 0).expect("search").is_empty());
}

#[test]
fn bm25_equal_scores_keep_insertion_order() {
    let mut index = Bm25Index::new();
    index.add(&[frag("first", "shared words"), frag("second", "shared words"), frag("third", "other")]).expect("add");
    let ids: Vec<String> = index.search("shared", 5).expect("search").into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["first", "second"]);
}

#[test]
fn bm25_add_is_append_only_and_remove_restores_stats() {
    let mut index = Bm25Index::new();
    index.add(&[frag("a", "one two three four"), frag("b", "five six")]).expect("add");
    assert_eq!(index.len(), 2);
    assert!((index.avg_length() - 3.0).abs() < 1e-6);

    index.add(&[frag("a", "one two three four")]).expect("re-add");
    assert_eq!(index.len(), 3, "duplicate ids are not collapsed by add");
    assert_eq!(index.doc_freq("one"), 2);

    assert!(index.remove("a").expect("remove"));
    assert_eq!(index.len(), 1);
    assert_eq!(index.doc_freq("one"), 0);
    assert!((index.avg_length() - 2.0).abs() < 1e-6);
    assert!(!index.remove("a").expect("remove again"));
    assert!(index.search("one", 5).expect("search").is_empty());
}

fn word() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["rust", "vector", "ranking", "index", "query", "cosine", "token", "fusion", "the", "of"])
        .prop_map(|w| w.to_string())
}

fn texts() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::collection::vec(word(), 0..12).prop_map(|w| w.join(" ")), 1..20)
}

proptest! {
    #[test]
    fn search_is_bounded_and_sorted(docs in texts(), query in prop::collection::vec(word(), 1..4), k in 0usize..8) {
        let mut index = Bm25Index::new();
        let frags: Vec<Fragment> = docs.iter().enumerate().map(|(i, t)| frag(&format!("f{i}"), t)).collect();
        index.add(&frags).unwrap();
        let results = index.search(&query.join(" "), k).unwrap();
        prop_assert!(results.len() <= k);
        for pair in results.windows(2) { prop_assert!(pair[0].score >= pair[1].score); }
    }

    #[test]
    fn avg_length_is_mean_of_fragment_lengths(batches in prop::collection::vec(texts(), 1..4)) {
        let analyzer = Analyzer::new();
        let mut index = Bm25Index::new();
        let mut lengths = Vec::new();
        for (b, batch) in batches.iter().enumerate() {
            let frags: Vec<Fragment> = batch.iter().enumerate().map(|(i, t)| frag(&format!("b{b}f{i}"), t)).collect();
            lengths.extend(batch.iter().map(|t| analyzer.tokenize(t).len()));
            index.add(&frags).unwrap();
            let mean = lengths.iter().sum::<usize>() as f32 / lengths.len() as f32;
            prop_assert!((index.avg_length() - mean).abs() < 1e-4);
        }
    }
}
