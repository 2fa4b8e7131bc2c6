use rankdb_core::types::Meta;

/// `dot(a, b) / (|a| * |b|)`, 0 when either norm is 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0f32, 0f32, 0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom > 0.0 { dot / denom } else { 0.0 }
}

/// Exact-equality AND over every filter key. Entries without metadata, or
/// missing a filtered key, never match a non-empty filter.
pub fn matches_filter(metadata: Option<&Meta>, filter: &Meta) -> bool {
    if filter.is_empty() { return true; }
    let Some(meta) = metadata else { return false };
    filter.iter().all(|(k, v)| meta.get(k) == Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cosine_basics() {
        assert!((cosine(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine(&[1.0, 0.0], &[0.0, 3.0]).abs() < 1e-6);
        assert!((cosine(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn filter_is_exact_and_conjunctive() {
        let meta: Meta = [("lang".to_string(), json!("en")), ("year".to_string(), json!(2024))].into_iter().collect();
        let f = |pairs: &[(&str, serde_json::Value)]| -> Meta { pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect() };
        assert!(matches_filter(Some(&meta), &f(&[("lang", json!("en"))])));
        assert!(matches_filter(Some(&meta), &f(&[("lang", json!("en")), ("year", json!(2024))])));
        assert!(!matches_filter(Some(&meta), &f(&[("lang", json!("en")), ("year", json!(2023))])));
        assert!(!matches_filter(Some(&meta), &f(&[("topic", json!("x"))])));
        assert!(!matches_filter(None, &f(&[("lang", json!("en"))])));
        assert!(matches_filter(None, &Meta::new()));
    }
}
