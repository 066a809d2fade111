//! Directory-backed file storage backend.
//!
//! Every blob is stored as `<root>/<name>` with a 4-byte little-endian
//! CRC32 footer. The checksum is verified on read, so a truncated or
//! corrupted blob surfaces as a storage error instead of a garbage
//! record. Writes go through a temporary file and a rename.

use std::fs;
use std::path::PathBuf;

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::error::{PharosError, Result};
use crate::storage::Storage;

const FOOTER_LEN: usize = 4;

/// Configuration for [`FileStorage`].
#[derive(Debug, Clone)]
pub struct FileStorageConfig {
    /// Directory holding the blobs. Created if missing.
    pub path: PathBuf,
}

impl FileStorageConfig {
    /// Create a configuration for the given directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorageConfig { path: path.into() }
    }
}

/// Storage backend keeping each blob in a checksummed file.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open a file storage rooted at the configured directory.
    pub fn new(config: FileStorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.path)?;
        Ok(FileStorage { root: config.path })
    }

    fn blob_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(PharosError::invalid_argument(format!(
                "invalid blob name '{name}'"
            )));
        }
        Ok(self.root.join(name))
    }
}

impl Storage for FileStorage {
    fn read_blob(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(name)?;
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PharosError::not_found(format!("blob '{name}'")));
            }
            Err(e) => return Err(e.into()),
        };
        if raw.len() < FOOTER_LEN {
            return Err(PharosError::storage(format!(
                "blob '{name}' is truncated ({} bytes)",
                raw.len()
            )));
        }
        let (data, footer) = raw.split_at(raw.len() - FOOTER_LEN);
        let stored = LittleEndian::read_u32(footer);
        let computed = crc32fast::hash(data);
        if stored != computed {
            return Err(PharosError::storage(format!(
                "blob '{name}' checksum mismatch: stored {stored:#010x}, computed {computed:#010x}"
            )));
        }
        Ok(data.to_vec())
    }

    fn write_blob(&self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.blob_path(name)?;
        let mut footer = [0u8; FOOTER_LEN];
        LittleEndian::write_u32(&mut footer, crc32fast::hash(data));

        let mut payload = Vec::with_capacity(data.len() + FOOTER_LEN);
        payload.extend_from_slice(data);
        payload.extend_from_slice(&footer);

        let tmp = self.root.join(format!("{name}.tmp"));
        fs::write(&tmp, &payload)?;
        fs::rename(&tmp, &path)?;
        debug!("wrote blob '{name}' ({} bytes)", data.len());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.blob_path(name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    fn list_blobs(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".tmp") {
                    continue;
                }
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_blob(&self, name: &str) -> Result<()> {
        let path = self.blob_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PharosError::not_found(format!("blob '{name}'")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(FileStorageConfig::new(dir.path())).unwrap();

        storage.write_blob("index", b"payload").unwrap();
        assert!(storage.exists("index"));
        assert_eq!(storage.read_blob("index").unwrap(), b"payload");
        assert_eq!(storage.list_blobs().unwrap(), vec!["index"]);

        storage.delete_blob("index").unwrap();
        assert!(!storage.exists("index"));
    }

    #[test]
    fn test_corrupted_blob_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(FileStorageConfig::new(dir.path())).unwrap();
        storage.write_blob("index", b"payload").unwrap();

        // Flip a data byte behind the storage's back.
        let path = dir.path().join("index");
        let mut raw = fs::read(&path).unwrap();
        raw[0] ^= 0xFF;
        fs::write(&path, &raw).unwrap();

        assert!(matches!(
            storage.read_blob("index").unwrap_err(),
            PharosError::Storage(_)
        ));
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(FileStorageConfig::new(dir.path())).unwrap();

        fs::write(dir.path().join("stub"), b"xy").unwrap();
        let err = storage.read_blob("stub").unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_blob_name_with_separator_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(FileStorageConfig::new(dir.path())).unwrap();

        assert!(storage.write_blob("../escape", b"x").is_err());
        assert!(storage.read_blob("a/b").is_err());
    }
}
