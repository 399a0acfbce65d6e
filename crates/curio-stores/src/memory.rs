//! In-memory item store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use curio_core::{CurioError, CurioResult, InventoryItem, ItemPatch, ItemStore};

/// Item store backed by a plain in-memory collection.
///
/// New items go to the front, so `load_all` returns
/// most-recently-added-first, the same order the original catalog keeps.
#[derive(Default)]
pub struct InMemoryItemStore {
    items: RwLock<Vec<InventoryItem>>,
}

impl InMemoryItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with items, kept in the given order.
    pub fn with_items(items: Vec<InventoryItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Add a new item at the front of the collection.
    pub async fn add(&self, item: InventoryItem) {
        self.items.write().await.insert(0, item);
    }

    /// Remove an item by id. Returns whether anything was removed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        items.len() != before
    }

    /// Number of items in the collection.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn load_all(&self) -> CurioResult<Vec<InventoryItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn save_all(&self, items: &[InventoryItem]) -> CurioResult<()> {
        *self.items.write().await = items.to_vec();
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: ItemPatch) -> CurioResult<()> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CurioError::not_found(id))?;
        patch.apply(item);
        Ok(())
    }

    async fn update_many(&self, patches: &[(Uuid, ItemPatch)]) -> CurioResult<()> {
        let mut items = self.items.write().await;

        // All-or-nothing: verify every id before touching anything.
        for (id, _) in patches {
            if !items.iter().any(|item| item.id == *id) {
                return Err(CurioError::not_found(*id));
            }
        }
        for (id, patch) in patches {
            if let Some(item) = items.iter_mut().find(|item| item.id == *id) {
                patch.apply(item);
            }
        }
        Ok(())
    }
}
