//! Hypothetical Document Embedding: search with the embedding of a generated
//! answer passage instead of the query itself.

use rankdb_core::error::{Error, Result};
use rankdb_core::traits::{embed_all, Embedder, SimilarityStore, TextGenerator};
use rankdb_core::types::{Meta, ScoredResult};

/// Deterministic stand-in generator: a templated restatement of the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TextGenerator for TemplateGenerator {
    fn generate_hypothetical_answer(&self, query: &str) -> anyhow::Result<String> {
        Ok(format!(
            "This text hypothetically answers the following question: {query}. It mentions key concepts and likely definitions."
        ))
    }
}

pub fn hyde_query<V>(
    generator: &dyn TextGenerator,
    embedder: &dyn Embedder,
    store: &V,
    query: &str,
    k: usize,
    filter: Option<&Meta>,
) -> Result<Vec<ScoredResult>>
where
    V: SimilarityStore + ?Sized,
{
    if query.trim().is_empty() { return Err(Error::EmptyQuery); }
    let passage = generator.generate_hypothetical_answer(query).map_err(Error::Generation)?;
    tracing::debug!(query, passage = %passage, "hyde passage");
    let vector = embed_all(embedder, &[passage])?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Embedding(anyhow::anyhow!("embedder returned no vector for the passage")))?;
    store.query(&vector, k, filter)
}
