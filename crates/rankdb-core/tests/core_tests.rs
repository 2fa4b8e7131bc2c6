use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

use rankdb_core::config::{resolve_with_base, Config, FusionMode, RerankerKind, SegmenterKind, Settings};
use rankdb_core::data_processor::DataProcessor;
use rankdb_core::enrich::{dedupe_by_hash, enrich_fragments, HASH_KEY};
use rankdb_core::error::{Error, Stage};
use rankdb_core::eval::{macro_average, mrr_at_k, precision_at_k, recall_at_k};
use rankdb_core::segment::segmenter_from_settings;
use rankdb_core::traits::{embed_all, Embedder, Segmenter};
use rankdb_core::types::{Document, Fragment, Vector};

#[test]
fn load_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let docs = DataProcessor::new().load_directory(dir).expect("load");

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "a");
    assert_eq!(docs[0].text.trim(), "Short text");
    assert_eq!(docs[0].metadata["category"], "misc");
}

#[test]
fn load_directory_records_category_and_respects_limit() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("fire")).unwrap();
    fs::write(dir.join("fire/a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("fire/b.txt"), "charlie delta").unwrap();
    fs::write(dir.join("notes.md"), "ignored").unwrap();

    let all = DataProcessor::new().load_directory(dir).expect("load");
    assert_eq!(all.len(), 2, "only .txt files are loaded");
    assert!(all.iter().all(|d| d.metadata["category"] == "fire"));

    let limited = DataProcessor::with_limit(1).load_directory(dir).expect("load limited");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, "a");
}

#[test]
fn enrichment_adds_counts_and_dedupe_keeps_first() {
    let frags = vec![
        Fragment::new("x::0", "x", "same text"),
        Fragment::new("y::0", "y", "same text"),
        Fragment::new("z::0", "z", "other"),
    ];
    let enriched = enrich_fragments(frags);
    assert_eq!(enriched[0].metadata["char_count"], 9);
    assert_eq!(enriched[0].metadata["token_approx"], 3);
    assert_eq!(enriched[0].metadata[HASH_KEY], enriched[1].metadata[HASH_KEY]);

    let deduped = dedupe_by_hash(enriched);
    let ids: Vec<&str> = deduped.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["x::0", "z::0"]);
}

#[test]
fn settings_defaults_and_overrides() {
    let settings = Config::from_toml_str("").settings().expect("defaults");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.retrieval.rrf_k, 60.0);

    let toml = r#"
        [retrieval]
        alpha = 0.8
        fusion = "rrf"
        [rerank]
        kind = "mmr"
        mmr_lambda = 0.7
    "#;
    let config = Config::from_toml_str(toml);
    let settings = config.settings().expect("settings");
    assert_eq!(settings.retrieval.fusion, FusionMode::Rrf);
    assert_eq!(settings.rerank.kind, RerankerKind::Mmr);
    assert_eq!(settings.retrieval.top_k, 5, "unset keys keep defaults");
    assert!((settings.retrieval.alpha - 0.8).abs() < 1e-6);
}

#[test]
fn invalid_settings_are_config_errors() {
    let config = Config::from_toml_str("[segment]\nmax_tokens = 10\noverlap = 10\n");
    let err = config.settings().expect_err("overlap must be below max_tokens");
    assert_eq!(err.stage(), Stage::Config);
}

#[test]
fn segment_kind_selects_the_segmenter() {
    let doc = Document::new("n", "# Title\nbody text\n## Next\nmore body. Second line.");
    let cases = [("token", "n::0", 1), ("markdown", "n::m0", 2), ("sentence", "n::s0", 1), ("html", "n::0", 1)];
    for (kind, first_id, count) in cases {
        let settings = Config::from_toml_str(&format!("[segment]\nkind = \"{kind}\"\n")).settings().expect("settings");
        let frags = segmenter_from_settings(&settings.segment).expect("segmenter").segment(&doc).expect("segment");
        assert_eq!(frags[0].id, first_id, "{kind}");
        assert_eq!(frags.len(), count, "{kind}");
    }

    let settings = Config::from_toml_str("[segment]\nkind = \"markdown\"\n").settings().expect("settings");
    assert_eq!(settings.segment.kind, SegmenterKind::Markdown);
    let err = Config::from_toml_str("[segment]\nmax_section_tokens = 0\n").settings().expect_err("zero budget");
    assert_eq!(err.stage(), Stage::Config);
}

#[test]
fn relative_paths_resolve_against_the_base() {
    let base = Path::new("/srv/rankdb");
    assert_eq!(resolve_with_base(base, "data/index.json"), base.join("data/index.json"));
    assert_eq!(resolve_with_base(base, "/var/lib/rankdb"), Path::new("/var/lib/rankdb"));
}

struct ShortEmbedder;

impl Embedder for ShortEmbedder {
    fn dim(&self) -> usize { 2 }
    fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vector>> { Ok(vec![vec![1.0, 0.0]]) }
}

#[test]
fn embed_all_rejects_short_batches() {
    let texts = vec!["a".to_string(), "b".to_string()];
    let err = embed_all(&ShortEmbedder, &texts).expect_err("count mismatch");
    assert!(matches!(err, Error::Embedding(_)));
    assert_eq!(err.stage(), Stage::Embedding);
}

#[test]
fn ranking_metrics() {
    let ranked = ["a", "b", "c", "d"];
    let relevant: HashSet<String> = ["b", "d", "z"].iter().map(|s| s.to_string()).collect();
    assert!((precision_at_k(&ranked, &relevant, 2) - 0.5).abs() < 1e-9);
    assert!((recall_at_k(&ranked, &relevant, 4) - 2.0 / 3.0).abs() < 1e-9);
    assert!((mrr_at_k(&ranked, &relevant, 4) - 0.5).abs() < 1e-9);
    assert_eq!(mrr_at_k(&ranked, &relevant, 1), 0.0);
    assert_eq!(precision_at_k::<&str>(&[], &relevant, 3), 0.0);
    assert!((macro_average(&[1.0, 0.0, 0.5]) - 0.5).abs() < 1e-9);
}
