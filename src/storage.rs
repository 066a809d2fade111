//! Pluggable storage backends for persisting index records.
//!
//! A [`Storage`] is a flat namespace of named blobs. Pharos ships a
//! memory backend for tests and ephemeral indexes and a file backend
//! whose blobs carry a CRC32 footer verified on read.

pub mod file;
pub mod memory;

use std::sync::Arc;

use crate::error::Result;
use crate::storage::file::{FileStorage, FileStorageConfig};
use crate::storage::memory::{MemoryStorage, MemoryStorageConfig};

/// Trait for blob storage backends.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Read a blob's contents.
    fn read_blob(&self, name: &str) -> Result<Vec<u8>>;

    /// Write a blob, replacing any existing blob of the same name.
    fn write_blob(&self, name: &str, data: &[u8]) -> Result<()>;

    /// Check whether a blob exists.
    fn exists(&self, name: &str) -> bool;

    /// List all blob names.
    fn list_blobs(&self) -> Result<Vec<String>>;

    /// Delete a blob. Deleting a missing blob is an error.
    fn delete_blob(&self, name: &str) -> Result<()>;
}

/// Configuration for creating a storage backend.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage.
    Memory(MemoryStorageConfig),
    /// Directory-backed file storage.
    File(FileStorageConfig),
}

/// Factory for creating storage backends from configuration.
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage backend.
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        match config {
            StorageConfig::Memory(config) => Ok(Arc::new(MemoryStorage::new(config))),
            StorageConfig::File(config) => Ok(Arc::new(FileStorage::new(config)?)),
        }
    }
}
