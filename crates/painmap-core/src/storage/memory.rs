//! In-memory storage implementation.

use super::{BoxFuture, PainMapStore, StorageError, StorageResult, StoredPainMap};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, StoredPainMap>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with records, keyed by their ids.
    pub fn with_records(records: impl IntoIterator<Item = StoredPainMap>) -> Self {
        let records = records.into_iter().map(|record| (record.id.clone(), record)).collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl PainMapStore for MemoryStorage {
    fn save(&self, record: &StoredPainMap) -> BoxFuture<'_, StorageResult<()>> {
        let record = record.clone();
        Box::pin(async move {
            let mut records = self.records.write().map_err(lock_error)?;
            records.insert(record.id.clone(), record);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPainMap>> {
        let id = id.to_string();
        Box::pin(async move {
            let records = self.records.read().map_err(lock_error)?;
            records.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut records = self.records.write().map_err(lock_error)?;
            records.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let records = self.records.read().map_err(lock_error)?;
            let mut ids: Vec<String> = records.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let records = self.records.read().map_err(lock_error)?;
            Ok(records.contains_key(&id))
        })
    }
}
