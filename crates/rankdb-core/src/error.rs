use thiserror::Error;

/// The pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Input,
    Indexing,
    Embedding,
    Generation,
    Segmentation,
    Reranking,
    Persistence,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Vector dimension mismatch for '{id}': expected {expected}, got {actual}")]
    DimensionMismatch { id: String, expected: usize, actual: usize },

    #[error("Embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Text generation failed: {0}")]
    Generation(#[source] anyhow::Error),

    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    #[error("Reranking failed: {0}")]
    Reranking(String),

    #[error("Snapshot failed: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn stage(&self) -> Stage {
        match self {
            Error::InvalidConfig(_) => Stage::Config,
            Error::InvalidInput(_) | Error::EmptyQuery => Stage::Input,
            Error::DimensionMismatch { .. } => Stage::Indexing,
            Error::Embedding(_) => Stage::Embedding,
            Error::Generation(_) => Stage::Generation,
            Error::Segmentation(_) => Stage::Segmentation,
            Error::Reranking(_) => Stage::Reranking,
            Error::Snapshot(_) | Error::Io(_) => Stage::Persistence,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
