//! In-memory storage backend.

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::{PharosError, Result};
use crate::storage::Storage;

/// Configuration for [`MemoryStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageConfig {
    /// Initial capacity of the blob map.
    pub initial_capacity: usize,
}

/// Storage backend keeping all blobs in memory.
#[derive(Debug)]
pub struct MemoryStorage {
    blobs: RwLock<AHashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    pub fn new(config: MemoryStorageConfig) -> Self {
        MemoryStorage {
            blobs: RwLock::new(AHashMap::with_capacity(config.initial_capacity)),
        }
    }
}

impl Storage for MemoryStorage {
    fn read_blob(&self, name: &str) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| PharosError::not_found(format!("blob '{name}'")))
    }

    fn write_blob(&self, name: &str, data: &[u8]) -> Result<()> {
        self.blobs.write().insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.blobs.read().contains_key(name)
    }

    fn list_blobs(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.blobs.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn delete_blob(&self, name: &str) -> Result<()> {
        self.blobs
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| PharosError::not_found(format!("blob '{name}'")))
    }
}
