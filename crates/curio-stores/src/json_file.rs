//! JSON-file item store.
//!
//! Persists the whole collection as a single JSON document, the way the
//! original catalog kept everything under one browser-storage key. Reads
//! tolerate a missing file (empty collection) and lenient reminder fields;
//! a document that is not valid JSON at all is a read error. Writes are
//! rejected above a capacity ceiling (4 MiB by default) and land atomically
//! via a temp file and rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use curio_core::error::ErrorCode;
use curio_core::{CurioError, CurioResult, InventoryItem, ItemPatch, ItemStore};

/// Capacity ceiling matching the original catalog's storage budget.
pub const DEFAULT_CAPACITY_BYTES: u64 = 4 * 1024 * 1024;

/// Item store backed by one JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
    capacity_bytes: u64,
    /// Serializes read-modify-write cycles so concurrent updates cannot
    /// interleave between the read and the rename.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store at the given path with the default 4 MiB capacity.
    ///
    /// The file is created lazily on the first write; a missing file reads
    /// as an empty collection.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_capacity(path, DEFAULT_CAPACITY_BYTES)
    }

    /// Create a store with a custom capacity ceiling in bytes.
    pub fn with_capacity(path: impl AsRef<Path>, capacity_bytes: u64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capacity_bytes,
            write_lock: Mutex::new(()),
        }
    }

    /// The document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_items(&self) -> CurioResult<Vec<InventoryItem>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CurioError::StorageRead {
                    message: format!("failed to read {}", self.path.display()),
                    code: ErrorCode::StoreReadFailed,
                    source: Some(Box::new(e)),
                })
            }
        };

        serde_json::from_slice(&raw).map_err(|e| {
            CurioError::corrupted(
                format!("corrupt collection document at {}", self.path.display()),
                e,
            )
        })
    }

    async fn write_items(&self, items: &[InventoryItem]) -> CurioResult<()> {
        let serialized = serde_json::to_vec(items)?;
        let size = serialized.len() as u64;
        if size > self.capacity_bytes {
            return Err(CurioError::quota_exceeded(size, self.capacity_bytes));
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &serialized)
            .await
            .map_err(|e| write_error(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| write_error(&self.path, e))?;

        debug!(items = items.len(), bytes = size, "Collection document written");
        Ok(())
    }
}

fn write_error(path: &Path, e: std::io::Error) -> CurioError {
    CurioError::StorageWrite {
        message: format!("failed to write {}", path.display()),
        code: ErrorCode::StoreWriteFailed,
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn load_all(&self) -> CurioResult<Vec<InventoryItem>> {
        self.read_items().await
    }

    async fn save_all(&self, items: &[InventoryItem]) -> CurioResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_items(items).await
    }

    async fn update(&self, id: Uuid, patch: ItemPatch) -> CurioResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_items().await?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CurioError::not_found(id))?;
        patch.apply(item);
        self.write_items(&items).await
    }

    async fn update_many(&self, patches: &[(Uuid, ItemPatch)]) -> CurioResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_items().await?;

        for (id, patch) in patches {
            let item = items
                .iter_mut()
                .find(|item| item.id == *id)
                .ok_or_else(|| CurioError::not_found(*id))?;
            patch.apply(item);
        }

        // One durable write for the whole batch.
        self.write_items(&items).await
    }
}
