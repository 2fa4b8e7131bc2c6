use crate::error::{Error, Result};
use crate::types::{Document, Fragment, Meta, ScoredResult, Vector, VectorRecord};

/// Outbound embedding collaborator. Returns one vector per input text, in
/// input order, all of length `dim()`.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vector>>;
}

/// Outbound text generation collaborator used by HyDE.
pub trait TextGenerator: Send + Sync {
    fn generate_hypothetical_answer(&self, query: &str) -> anyhow::Result<String>;
}

/// Inbound segmentation collaborator.
pub trait Segmenter: Send + Sync {
    fn segment(&self, doc: &Document) -> Result<Vec<Fragment>>;
}

/// Lexical index over fragment text.
///
/// `add` is append-only: adding an id twice indexes it twice. Callers that
/// re-ingest must `remove` first.
pub trait SparseIndex: Send + Sync {
    fn add(&mut self, fragments: &[Fragment]) -> Result<()>;
    fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredResult>>;
    fn remove(&mut self, id: &str) -> Result<bool>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Dense store of fragment vectors.
pub trait SimilarityStore: Send + Sync {
    fn upsert(&mut self, items: Vec<VectorRecord>) -> Result<()>;
    fn query(&self, vector: &[f32], k: usize, filter: Option<&Meta>) -> Result<Vec<ScoredResult>>;
    fn remove(&mut self, id: &str) -> Result<bool>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool { self.len() == 0 }
    /// Text lookup used to hydrate results. Stores without text return `None`.
    fn get_text(&self, _id: &str) -> Option<String> { None }
}

/// Post-processes an already retrieved candidate list, returning at most `top_k`.
pub trait Reranker: Send + Sync {
    fn rerank(&self, query: &str, results: Vec<ScoredResult>, top_k: usize) -> Result<Vec<ScoredResult>>;
}

/// Calls the embedder and checks the collaborator contract (one vector per text).
pub fn embed_all(embedder: &dyn Embedder, texts: &[String]) -> Result<Vec<Vector>> {
    let vectors = embedder.embed_batch(texts).map_err(Error::Embedding)?;
    if vectors.len() != texts.len() {
        return Err(Error::Embedding(anyhow::anyhow!(
            "embedder returned {} vectors for {} texts",
            vectors.len(),
            texts.len()
        )));
    }
    Ok(vectors)
}
