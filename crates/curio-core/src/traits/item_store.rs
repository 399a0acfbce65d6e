//! Item store trait and the patch type consumed by its update interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CurioResult;
use crate::types::{Disposition, InventoryItem};

/// Partial update applied to a stored item.
///
/// This is the only mutation surface the reminder engine uses: it touches
/// the disposition and the reminder's acknowledgment timestamp and nothing
/// else. `apply` is the single write site for the acknowledgment timestamp,
/// mirroring `InventoryItem::effective_baseline` on the read side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    /// New disposition, if changing.
    pub disposition: Option<Disposition>,
    /// Acknowledgment instant to advance `last_acknowledged` to.
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl ItemPatch {
    /// Patch that records an acknowledgment (snooze) at `now`.
    pub fn acknowledge(now: DateTime<Utc>) -> Self {
        Self {
            disposition: None,
            acknowledged_at: Some(now),
        }
    }

    /// Patch that changes disposition and records an acknowledgment, so a
    /// resolved item does not immediately re-trigger.
    pub fn resolve(disposition: Disposition, now: DateTime<Utc>) -> Self {
        Self {
            disposition: Some(disposition),
            acknowledged_at: Some(now),
        }
    }

    /// Apply this patch to an item in place.
    ///
    /// The acknowledgment timestamp only advances; an item without a
    /// reminder policy has no timestamp to advance and the acknowledgment
    /// part is a no-op.
    pub fn apply(&self, item: &mut InventoryItem) {
        if let Some(disposition) = self.disposition {
            item.status = disposition;
        }
        if let Some(instant) = self.acknowledged_at {
            if let Some(reminder) = item.reminder.as_mut() {
                reminder.acknowledge(instant);
            }
        }
    }
}

/// Core item store trait - all persistence backends implement this.
///
/// The reminder engine consumes this interface only; it never reaches the
/// underlying medium directly. Implementations must keep `load_all` order
/// stable between calls with no intervening writes.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Load the full item collection, in the store's native order
    /// (most-recently-added-first for the provided backends).
    async fn load_all(&self) -> CurioResult<Vec<InventoryItem>>;

    /// Replace the full item collection.
    async fn save_all(&self, items: &[InventoryItem]) -> CurioResult<()>;

    /// Apply a partial update to one item.
    async fn update(&self, id: Uuid, patch: ItemPatch) -> CurioResult<()>;

    /// Apply partial updates to several items as a single logical batch:
    /// either every patch is durably persisted or none is.
    async fn update_many(&self, patches: &[(Uuid, ItemPatch)]) -> CurioResult<()>;
}
