use std::env;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use rankdb_core::config::{resolve_with_base, Config, FusionMode, RerankerKind, Settings};
use rankdb_core::data_processor::DataProcessor;
use rankdb_core::types::{Meta, ScoredResult};
use rankdb_hybrid::Engine;

const INGEST_BATCH: usize = 32;

struct Args {
    data_dir: Option<PathBuf>,
    query: String,
    k: Option<usize>,
    prf: bool,
    hyde: bool,
    category: Option<String>,
    snapshot: Option<PathBuf>,
}

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {} ingest-query <data_dir> <query> [--k N] [--alpha A] [--rerank none|penalty|mmr] [--rrf] [--prf] [--hyde] [--category C] [--snapshot PATH]", prog);
    std::process::exit(1)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    args.get(i + 1).map(String::as_str).unwrap_or_else(|| { eprintln!("Error: {} requires a value", flag); std::process::exit(1) })
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    value(args, i, flag).parse().unwrap_or_else(|_| { eprintln!("Error: {} requires a number", flag); std::process::exit(1) })
}

fn parse_args(settings: &mut Settings) -> Args {
    let mut raw: Vec<String> = env::args().collect();
    let prog = raw.remove(0);
    if raw.first().map(String::as_str) != Some("ingest-query") { usage(&prog); }
    let args = &raw[1..];

    let mut positional = Vec::new();
    let mut parsed = Args { data_dir: None, query: String::new(), k: None, prf: false, hyde: false, category: None, snapshot: None };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--k" => { parsed.k = Some(number(args, i, "--k")); i += 1; }
            "--alpha" => { settings.retrieval.alpha = number(args, i, "--alpha"); i += 1; }
            "--rerank" => {
                settings.rerank.kind = match value(args, i, "--rerank") {
                    "none" => RerankerKind::None,
                    "penalty" => RerankerKind::Penalty,
                    "mmr" => RerankerKind::Mmr,
                    other => { eprintln!("Error: unknown reranker '{}'", other); std::process::exit(1) }
                };
                i += 1;
            }
            "--rrf" => settings.retrieval.fusion = FusionMode::Rrf,
            "--prf" => parsed.prf = true,
            "--hyde" => parsed.hyde = true,
            "--category" => { parsed.category = Some(value(args, i, "--category").to_string()); i += 1; }
            "--snapshot" => { parsed.snapshot = Some(PathBuf::from(value(args, i, "--snapshot"))); i += 1; }
            a if !a.starts_with('-') => positional.push(a.to_string()),
            other => { eprintln!("Error: unknown flag '{}'", other); usage(&prog) }
        }
        i += 1;
    }
    match positional.as_slice() {
        [query] => parsed.query = query.clone(),
        [dir, query] => { parsed.data_dir = Some(PathBuf::from(dir)); parsed.query = query.clone(); }
        _ => usage(&prog),
    }
    parsed
}

fn print_results(query: &str, results: &[ScoredResult]) {
    println!("\nFound {} results for: \"{}\"", results.len(), query);
    for (i, r) in results.iter().enumerate() {
        let category = r.metadata.as_ref().and_then(|m| m.get("category")).and_then(|v| v.as_str()).unwrap_or("-");
        println!("\n  {}. score={:.4}  id={}  category={}", i + 1, r.score, r.id, category);
        if let Some(text) = &r.text {
            let preview: String = text.chars().take(160).collect();
            println!("     {}", preview);
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut settings = match Config::load() {
        Ok(config) => config.settings()?,
        Err(e) => { tracing::warn!(error = %e, "no usable config, using defaults"); Settings::default() }
    };
    let args = parse_args(&mut settings);
    settings.validate()?;

    // configured paths are relative to the working directory, where config.toml is read from
    let cwd = env::current_dir()?;
    let data_dir = args.data_dir.clone().unwrap_or_else(|| resolve_with_base(&cwd, &settings.data.raw_txt_dir));
    let k = args.k.unwrap_or(settings.retrieval.top_k);
    println!("rankdb ingest-query\n===================");
    println!("Data directory: {}", data_dir.display());

    let docs = DataProcessor::new().load_directory(&data_dir)?;
    let mut engine = Engine::from_settings(&settings)?;

    let pb = ProgressBar::new(docs.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len}")?);
    pb.set_message("Ingesting");
    let (mut fragments, mut duplicates, mut superseded) = (0, 0, 0);
    for batch in docs.chunks(INGEST_BATCH) {
        let report = engine.ingest(batch)?;
        fragments += report.fragments;
        duplicates += report.duplicates;
        superseded += report.superseded;
        pb.inc(batch.len() as u64);
    }
    pb.finish_with_message("Ingested");
    println!("Indexed {} documents as {} fragments ({} duplicates dropped, {} replaced by a later fragment with the same id)", docs.len(), fragments, duplicates, superseded);

    let snapshot = args.snapshot.clone().or_else(|| settings.data.snapshot_path.as_deref().map(|p| resolve_with_base(&cwd, p)));
    if let Some(path) = snapshot {
        engine.retriever().store().save_json(&path)?;
        println!("Saved store snapshot to {}", path.display());
    }

    let filter: Option<Meta> = args.category.as_ref().map(|c| [("category".to_string(), serde_json::Value::String(c.clone()))].into_iter().collect());
    let results = if args.hyde {
        engine.retrieve_hyde(&args.query, k, filter.as_ref())?
    } else if args.prf {
        engine.retrieve_expanded(&args.query, k, filter.as_ref())?
    } else {
        engine.retrieve(&args.query, k, filter.as_ref())?
    };
    print_results(&args.query, &results);
    Ok(())
}
