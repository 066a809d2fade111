//! High-level index lifecycle over a storage backend.
//!
//! [`IndexStore`] owns the canonical blob name of the serialized record
//! and a cached searcher. Saving a new record invalidates the cache so
//! that readers always see the latest committed index.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::error::Result;
use crate::record::SearchIndexRecord;
use crate::searcher::Searcher;
use crate::storage::Storage;

/// Canonical blob name of the serialized record.
pub const INDEX_BLOB: &str = "searchindex.json";

/// Loads, saves, and caches a searcher over one index record.
pub struct IndexStore {
    storage: Arc<dyn Storage>,
    searcher_cache: RwLock<Option<Arc<Searcher>>>,
}

impl std::fmt::Debug for IndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("storage", &self.storage)
            .field("cached", &self.searcher_cache.read().is_some())
            .finish()
    }
}

impl IndexStore {
    /// Create a store over the given storage backend.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        IndexStore {
            storage,
            searcher_cache: RwLock::new(None),
        }
    }

    /// Check whether a record has been saved.
    pub fn exists(&self) -> bool {
        self.storage.exists(INDEX_BLOB)
    }

    /// Validate and persist a record, invalidating the cached searcher.
    pub fn save(&self, record: &SearchIndexRecord) -> Result<()> {
        record.validate()?;
        let json = record.to_json()?;
        self.storage.write_blob(INDEX_BLOB, json.as_bytes())?;
        *self.searcher_cache.write() = None;
        info!(
            "saved search index ({} documents, {} bytes)",
            record.doc_count(),
            json.len()
        );
        Ok(())
    }

    /// Load and validate the persisted record.
    pub fn load(&self) -> Result<SearchIndexRecord> {
        let bytes = self.storage.read_blob(INDEX_BLOB)?;
        let record: SearchIndexRecord = serde_json::from_slice(&bytes)?;
        record.validate()?;
        debug!("loaded search index ({} documents)", record.doc_count());
        Ok(record)
    }

    /// A searcher over the persisted record, cached until the next save.
    pub fn searcher(&self) -> Result<Arc<Searcher>> {
        if let Some(searcher) = self.searcher_cache.read().as_ref() {
            return Ok(searcher.clone());
        }
        let searcher = Arc::new(Searcher::open(self.load()?)?);
        *self.searcher_cache.write() = Some(searcher.clone());
        Ok(searcher)
    }

    /// Decide whether the index must be rebuilt.
    ///
    /// Returns true when no record is stored, the stored record cannot be
    /// loaded, or its `envversion` tags differ from the expected tags.
    pub fn needs_rebuild(&self, expected: &BTreeMap<String, u64>) -> bool {
        if !self.exists() {
            debug!("no stored index, rebuild needed");
            return true;
        }
        match self.load() {
            Ok(record) => {
                let stale = !record.is_compatible(expected);
                if stale {
                    debug!(
                        "stored envversion {:?} differs from expected {:?}",
                        record.envversion, expected
                    );
                }
                stale
            }
            Err(e) => {
                warn!("stored index is unreadable, rebuild needed: {e}");
                true
            }
        }
    }
}
