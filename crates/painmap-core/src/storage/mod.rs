//! Storage abstraction for persisting pain maps.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::model::PainMapModel;
use crate::playback::TimelineEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Pain map not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by storage backends.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A pain map as stored: the snapshot plus when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPainMap {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub model: PainMapModel,
}

impl StoredPainMap {
    /// Record `model` under `id`, stamped now.
    pub fn new(id: impl Into<String>, model: PainMapModel) -> Self {
        Self {
            id: id.into(),
            recorded_at: Utc::now(),
            model,
        }
    }

    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Parse a stored record. Region entries are deduplicated like any
    /// other ingested model.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let mut record: Self =
            serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
        if let Some(regions) = record.model.regions.take() {
            record.model = record.model.with_regions(regions);
        }
        Ok(record)
    }

    /// View this record as a playback timeline entry.
    pub fn timeline_entry(&self) -> TimelineEntry {
        TimelineEntry::recorded_at(self.model.clone(), self.recorded_at)
    }
}

/// Trait for pain map storage backends.
///
/// Requests complete asynchronously; a failed request leaves the caller's
/// in-memory state untouched so it can be retried.
pub trait PainMapStore: Send + Sync {
    /// Save (or overwrite) a record under its id.
    fn save(&self, record: &StoredPainMap) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a record.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPainMap>>;

    /// Delete a record. Deleting a missing id succeeds.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all record ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a record exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;

    /// Load every record, oldest first.
    fn load_all(&self) -> BoxFuture<'_, StorageResult<Vec<StoredPainMap>>> {
        Box::pin(async move {
            let mut records = Vec::new();
            for id in self.list().await? {
                records.push(self.load(&id).await?);
            }
            records.sort_by_key(|record| record.recorded_at);
            Ok(records)
        })
    }

    /// Every record as a playback timeline entry, oldest first.
    fn timeline(&self) -> BoxFuture<'_, StorageResult<Vec<TimelineEntry>>> {
        Box::pin(async move {
            let records = self.load_all().await?;
            Ok(records.iter().map(StoredPainMap::timeline_entry).collect())
        })
    }
}
