use std::collections::BTreeMap;
use std::sync::Arc;

use pharos::storage::file::FileStorageConfig;
use pharos::storage::memory::MemoryStorageConfig;
use pharos::{
    ENV_VERSION, ENV_VERSION_KEY, INDEX_BLOB, IndexStore, IndexWriter, Page, Result,
    SearchRequest, StorageConfig, StorageFactory,
};

fn build_record() -> Result<pharos::SearchIndexRecord> {
    let mut writer = IndexWriter::default();
    writer.add_page(
        Page::new("hydrophone", "Hydrophone Data")
            .with_body("Stream hydrophone recordings from the archive."),
    )?;
    writer.add_page(
        Page::new("request", "Requesting Data")
            .with_body("Request hydrophone records over a time window."),
    )?;
    let (record, _) = writer.build()?;
    Ok(record)
}

fn expected_envversion() -> BTreeMap<String, u64> {
    BTreeMap::from([(ENV_VERSION_KEY.to_string(), ENV_VERSION)])
}

#[test]
fn test_memory_store_lifecycle() -> Result<()> {
    let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default()))?;
    let store = IndexStore::new(storage);

    assert!(!store.exists());
    assert!(store.needs_rebuild(&expected_envversion()));

    let record = build_record()?;
    store.save(&record)?;

    assert!(store.exists());
    assert!(!store.needs_rebuild(&expected_envversion()));
    assert_eq!(store.load()?, record);

    let searcher = store.searcher()?;
    let hits = searcher.search(&SearchRequest::new("hydrophone"))?;
    assert_eq!(hits.len(), 2);
    Ok(())
}

#[test]
fn test_searcher_cache_invalidated_by_save() -> Result<()> {
    let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default()))?;
    let store = IndexStore::new(storage);
    store.save(&build_record()?)?;

    let first = store.searcher()?;
    let second = store.searcher()?;
    assert!(Arc::ptr_eq(&first, &second), "searcher should be cached");

    store.save(&build_record()?)?;
    let third = store.searcher()?;
    assert!(
        !Arc::ptr_eq(&first, &third),
        "save should invalidate the cached searcher"
    );
    Ok(())
}

#[test]
fn test_needs_rebuild_on_version_change() -> Result<()> {
    let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default()))?;
    let store = IndexStore::new(storage);
    store.save(&build_record()?)?;

    let mut bumped = expected_envversion();
    bumped.insert(ENV_VERSION_KEY.to_string(), ENV_VERSION + 1);
    assert!(store.needs_rebuild(&bumped));
    Ok(())
}

#[test]
fn test_file_store_persists_across_instances() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let record = build_record()?;

    {
        let storage = StorageFactory::create(StorageConfig::File(FileStorageConfig::new(
            dir.path(),
        )))?;
        IndexStore::new(storage).save(&record)?;
    }

    let storage =
        StorageFactory::create(StorageConfig::File(FileStorageConfig::new(dir.path())))?;
    let store = IndexStore::new(storage);
    assert_eq!(store.load()?, record);
    assert!(!store.needs_rebuild(&expected_envversion()));
    Ok(())
}

#[test]
fn test_corrupted_index_forces_rebuild() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let storage =
        StorageFactory::create(StorageConfig::File(FileStorageConfig::new(dir.path())))?;
    let store = IndexStore::new(storage);
    store.save(&build_record()?)?;

    // Flip a byte in the stored blob; the checksum footer catches it.
    let path = dir.path().join(INDEX_BLOB);
    let mut raw = std::fs::read(&path).unwrap();
    raw[10] ^= 0xFF;
    std::fs::write(&path, &raw).unwrap();

    assert!(store.load().is_err());
    assert!(store.needs_rebuild(&expected_envversion()));
    Ok(())
}
