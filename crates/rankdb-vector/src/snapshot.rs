//! JSON snapshots of an `InMemoryStore`, records kept in slot order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use rankdb_core::error::{Error, Result};
use rankdb_core::traits::SimilarityStore;
use rankdb_core::types::VectorRecord;

use crate::store::InMemoryStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub dim: Option<usize>,
    pub items: Vec<VectorRecord>,
}

impl InMemoryStore {
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot { dim: self.dim(), items: self.records().to_vec() }
    }

    /// Upserts every snapshot record, so dimension checks still apply.
    pub fn restore(&mut self, snapshot: StoreSnapshot) -> Result<()> {
        if let (Some(own), Some(theirs)) = (self.dim(), snapshot.dim) {
            if own != theirs {
                return Err(Error::DimensionMismatch { id: "<snapshot>".to_string(), expected: own, actual: theirs });
            }
        }
        self.upsert(snapshot.items)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(&self.snapshot()).map_err(|e| Error::Snapshot(e.to_string()))?;
        fs::write(path, json)?;
        info!(path = %path.display(), items = self.len(), "saved store snapshot");
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let snapshot: StoreSnapshot = serde_json::from_str(&raw).map_err(|e| Error::Snapshot(e.to_string()))?;
        let mut store = match snapshot.dim { Some(d) => InMemoryStore::with_dim(d), None => InMemoryStore::new() };
        store.restore(snapshot)?;
        Ok(store)
    }
}
