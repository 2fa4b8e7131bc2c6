//! rankdb-vector
//!
//! Dense side of rankdb: cosine similarity, metadata filters and a brute-force
//! in-memory `SimilarityStore` with JSON snapshots. An approximate index can
//! replace `InMemoryStore` behind the same trait without touching callers.

pub mod similarity;
pub mod snapshot;
pub mod store;

pub use similarity::{cosine, matches_filter};
pub use snapshot::StoreSnapshot;
pub use store::InMemoryStore;
