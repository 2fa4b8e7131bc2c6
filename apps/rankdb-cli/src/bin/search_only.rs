use std::env;
use std::path::PathBuf;

use rankdb_core::data_processor::DataProcessor;
use rankdb_core::segment::TokenSegmenter;
use rankdb_core::traits::{Segmenter, SparseIndex};
use rankdb_text::Bm25Index;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <data_dir> <query> [--k N]", args[0]);
        eprintln!("Example: {} ./data/txt 'survival fire' --k 5", args[0]);
        std::process::exit(1);
    }
    let data_dir = PathBuf::from(&args[1]);
    let query_text = &args[2];
    let mut limit = 10usize;
    let mut i = 3;
    while i < args.len() {
        if args[i] == "--k" {
            match args.get(i + 1).and_then(|l| l.parse::<usize>().ok()) {
                Some(l) => { limit = l; i += 1; }
                None => { eprintln!("Error: --k requires a number"); std::process::exit(1); }
            }
        }
        i += 1;
    }
    println!("rankdb-sparse\n=============");
    println!("Query: {}", query_text);
    println!("Data directory: {}", data_dir.display());

    let docs = DataProcessor::new().load_directory(&data_dir)?;
    let segmenter = TokenSegmenter::default();
    let mut index = Bm25Index::new();
    for doc in &docs { index.add(&segmenter.segment(doc)?)?; }
    println!("Indexed {} fragments from {} documents (avg length {:.1})", index.len(), docs.len(), index.avg_length());

    let results = index.search(query_text, limit)?;
    println!("\nFound {} results for: \"{}\"", results.len(), query_text);
    for (i, r) in results.iter().enumerate() {
        println!("  {}. score={:.4}  id={}", i + 1, r.score, r.id);
    }
    Ok(())
}
