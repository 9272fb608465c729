//! File-based storage: one JSON file per pain map.

use super::{BoxFuture, PainMapStore, StorageError, StorageResult, StoredPainMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores records as `<id>.json` files in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| io_error("create", &base_path, e))?;
        }
        Ok(Self { base_path })
    }

    /// Storage in the platform data directory (`<data>/painmap/records`).
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("No data or home directory for pain map records".to_string()))?;
        Self::new(base.join("painmap").join("records"))
    }

    /// File path for a record id. Characters outside `[A-Za-z0-9_-]` map to `_`.
    fn record_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("Cannot {} {}: {}", action, path.display(), err))
}

impl PainMapStore for FileStorage {
    fn save(&self, record: &StoredPainMap) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.record_path(&record.id);
        let staging = path.with_extension("json.tmp");
        let json = record.to_json();
        Box::pin(async move {
            let json = json?;
            // Records on disk are always complete: stage, then rename over.
            fs::write(&staging, json).map_err(|e| io_error("write", &staging, e))?;
            fs::rename(&staging, &path).map_err(|e| io_error("replace", &path, e))?;
            log::info!("Pain map record written to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPainMap>> {
        let path = self.record_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let json = fs::read_to_string(&path).map_err(|e| io_error("read", &path, e))?;
            StoredPainMap::from_json(&json)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.record_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| io_error("delete", &path, e))?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(Vec::new());
            }
            let entries = fs::read_dir(&base).map_err(|e| io_error("list", &base, e))?;
            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.record_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
