//! Metadata enrichment and hash-based deduplication applied before indexing.

use std::collections::HashSet;

use crate::types::Fragment;

pub const HASH_KEY: &str = "hash";

pub fn content_hash(text: &str) -> String { blake3::hash(text.as_bytes()).to_hex().to_string() }

/// Adds `char_count`, `token_approx` (about four chars per token) and `hash`.
pub fn enrich_fragments(fragments: Vec<Fragment>) -> Vec<Fragment> {
    fragments
        .into_iter()
        .map(|mut f| {
            let char_count = f.text.chars().count();
            let token_approx = char_count.div_ceil(4).max(1);
            f.metadata.insert("char_count".to_string(), char_count.into());
            f.metadata.insert("token_approx".to_string(), token_approx.into());
            f.metadata.insert(HASH_KEY.to_string(), content_hash(&f.text).into());
            f
        })
        .collect()
}

/// Keeps the first fragment per content hash. Uses the `hash` metadata when
/// present, otherwise hashes the text.
pub fn dedupe_by_hash(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut seen = HashSet::new();
    fragments
        .into_iter()
        .filter(|f| {
            let hash = match f.metadata.get(HASH_KEY).and_then(|v| v.as_str()) {
                Some(h) => h.to_string(),
                None => content_hash(&f.text),
            };
            seen.insert(hash)
        })
        .collect()
}
