//! Reminder engine: scanning and acknowledgment transitions.
//!
//! The engine is the only writer of reminder state. It scans the item
//! collection for the due subset and applies the three acknowledgment
//! operations (snooze, resolve-with-disposition, dismiss-all), each of
//! which advances the acknowledged item's timestamp so it stays quiet for
//! at least one full cadence.
//!
//! Every successful acknowledgment answers with the due set re-scanned
//! from the store's authoritative state. On a store failure the write is a
//! no-op: the error propagates and the item remains due on the next scan.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CurioResult;
use crate::reminders::evaluator::due_items;
use crate::traits::{ItemPatch, ItemStore};
use crate::types::{Disposition, InventoryItem};

/// Stateful driver over an item store.
pub struct ReminderEngine {
    store: Arc<dyn ItemStore>,
    /// Item ids with an acknowledgment write currently pending. A second
    /// acknowledgment for one of these ids is ignored rather than issued in
    /// parallel.
    in_flight: Mutex<HashSet<Uuid>>,
}

impl ReminderEngine {
    /// Create an engine over the given store.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Scan the collection for items due at `now`.
    ///
    /// Pure over the loaded collection: the due subset in stable store
    /// order. A read failure propagates; the caller treats it as an empty
    /// cycle and retries on the next one.
    pub async fn scan(&self, now: DateTime<Utc>) -> CurioResult<Vec<InventoryItem>> {
        let items = self.store.load_all().await?;
        let due = due_items(&items, now);
        debug!(total = items.len(), due = due.len(), "Reminder scan complete");
        Ok(due)
    }

    /// Scan at the current wall-clock instant.
    pub async fn scan_now(&self) -> CurioResult<Vec<InventoryItem>> {
        self.scan(Utc::now()).await
    }

    /// Snooze one due item: record an acknowledgment at `now`, leaving its
    /// disposition unchanged. The item becomes due again after another full
    /// cadence.
    pub async fn snooze(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> CurioResult<Vec<InventoryItem>> {
        self.acknowledge_one(item_id, ItemPatch::acknowledge(now), now)
            .await
    }

    /// Resolve one due item with a new disposition. The acknowledgment
    /// timestamp is refreshed too, so the resolved item does not
    /// immediately re-trigger.
    pub async fn resolve(
        &self,
        item_id: Uuid,
        disposition: Disposition,
        now: DateTime<Utc>,
    ) -> CurioResult<Vec<InventoryItem>> {
        self.acknowledge_one(item_id, ItemPatch::resolve(disposition, now), now)
            .await
    }

    /// Dismiss every item in the presented due set at once: one batched
    /// write stamping the same acknowledgment instant on each, dispositions
    /// untouched.
    pub async fn dismiss_all(
        &self,
        due: &[InventoryItem],
        now: DateTime<Utc>,
    ) -> CurioResult<Vec<InventoryItem>> {
        let mut guard = self.in_flight.lock().await;
        let ids: Vec<Uuid> = due
            .iter()
            .map(|item| item.id)
            .filter(|id| !guard.contains(id))
            .collect();
        for id in &ids {
            guard.insert(*id);
        }
        drop(guard);

        if ids.is_empty() {
            return self.scan(now).await;
        }

        let patches: Vec<(Uuid, ItemPatch)> = ids
            .iter()
            .map(|id| (*id, ItemPatch::acknowledge(now)))
            .collect();
        let result = self.store.update_many(&patches).await;

        let mut guard = self.in_flight.lock().await;
        for id in &ids {
            guard.remove(id);
        }
        drop(guard);

        result?;
        info!(dismissed = ids.len(), "Dismissed all due reminders");
        self.scan(now).await
    }

    async fn acknowledge_one(
        &self,
        item_id: Uuid,
        patch: ItemPatch,
        now: DateTime<Utc>,
    ) -> CurioResult<Vec<InventoryItem>> {
        {
            let mut guard = self.in_flight.lock().await;
            if !guard.insert(item_id) {
                debug!(%item_id, "Acknowledgment already in flight, ignoring re-entry");
                return self.scan(now).await;
            }
        }

        let result = self.store.update(item_id, patch).await;
        self.in_flight.lock().await.remove(&item_id);
        result?;

        debug!(%item_id, "Acknowledgment persisted");
        self.scan(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurioError;
    use crate::types::{ReminderInterval, ReminderPolicy};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::{RwLock, Semaphore};

    /// In-memory store double with fault injection and a write gate for
    /// exercising the in-flight guard deterministically.
    struct StubStore {
        items: RwLock<Vec<InventoryItem>>,
        fail_writes: AtomicBool,
        gate_writes: AtomicBool,
        update_calls: AtomicUsize,
        entered: Semaphore,
        release: Semaphore,
    }

    impl StubStore {
        fn new(items: Vec<InventoryItem>) -> Self {
            Self {
                items: RwLock::new(items),
                fail_writes: AtomicBool::new(false),
                gate_writes: AtomicBool::new(false),
                update_calls: AtomicUsize::new(0),
                entered: Semaphore::new(0),
                release: Semaphore::new(0),
            }
        }

        fn fail_writes(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        fn gate_writes(&self) {
            self.gate_writes.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ItemStore for StubStore {
        async fn load_all(&self) -> CurioResult<Vec<InventoryItem>> {
            Ok(self.items.read().await.clone())
        }

        async fn save_all(&self, items: &[InventoryItem]) -> CurioResult<()> {
            *self.items.write().await = items.to_vec();
            Ok(())
        }

        async fn update(&self, id: Uuid, patch: ItemPatch) -> CurioResult<()> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            if self.gate_writes.load(Ordering::SeqCst) {
                self.entered.add_permits(1);
                let _permit = self.release.acquire().await.unwrap();
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CurioError::quota_exceeded(5_000_000, 4_194_304));
            }
            let mut items = self.items.write().await;
            let item = items
                .iter_mut()
                .find(|item| item.id == id)
                .ok_or_else(|| CurioError::not_found(id))?;
            patch.apply(item);
            Ok(())
        }

        async fn update_many(&self, patches: &[(Uuid, ItemPatch)]) -> CurioResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CurioError::storage_write("medium rejected the write"));
            }
            let mut items = self.items.write().await;
            for (id, patch) in patches {
                let item = items
                    .iter_mut()
                    .find(|item| item.id == *id)
                    .ok_or_else(|| CurioError::not_found(*id))?;
                patch.apply(item);
            }
            Ok(())
        }
    }

    fn utc(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    fn due_item(name: &str) -> InventoryItem {
        InventoryItem::new(name, "misc")
            .added_at(utc(2024, 1, 1))
            .with_reminder(ReminderPolicy::fixed(ReminderInterval::OneMonth))
    }

    fn fixture() -> (Arc<StubStore>, ReminderEngine, DateTime<Utc>) {
        let items = vec![due_item("newest"), due_item("middle"), due_item("oldest")];
        let store = Arc::new(StubStore::new(items));
        let engine = ReminderEngine::new(store.clone());
        (store, engine, utc(2024, 6, 1))
    }

    #[tokio::test]
    async fn test_scan_preserves_store_order() {
        let (_store, engine, now) = fixture();

        let due = engine.scan(now).await.unwrap();
        let names: Vec<&str> = due.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["newest", "middle", "oldest"]);

        // Idempotent with no intervening acknowledgment or time passage.
        let again = engine.scan(now).await.unwrap();
        assert_eq!(again, due);
    }

    #[tokio::test]
    async fn test_snooze_removes_item_and_persists() {
        let (store, engine, now) = fixture();
        let due = engine.scan(now).await.unwrap();
        let snoozed_id = due[1].id;

        let refreshed = engine.snooze(snoozed_id, now).await.unwrap();
        assert_eq!(refreshed.len(), 2);
        assert!(refreshed.iter().all(|item| item.id != snoozed_id));

        // Disposition untouched, timestamp persisted through the store.
        let stored = store.load_all().await.unwrap();
        let item = stored.iter().find(|i| i.id == snoozed_id).unwrap();
        assert_eq!(item.status, Disposition::Owned);
        assert_eq!(item.reminder.as_ref().unwrap().last_acknowledged, Some(now));
    }

    #[tokio::test]
    async fn test_resolve_sets_disposition_and_acknowledges() {
        let (store, engine, now) = fixture();
        let due = engine.scan(now).await.unwrap();
        let resolved_id = due[0].id;

        let refreshed = engine
            .resolve(resolved_id, Disposition::Listed, now)
            .await
            .unwrap();
        assert!(refreshed.iter().all(|item| item.id != resolved_id));

        let stored = store.load_all().await.unwrap();
        let item = stored.iter().find(|i| i.id == resolved_id).unwrap();
        assert_eq!(item.status, Disposition::Listed);
        assert_eq!(item.reminder.as_ref().unwrap().last_acknowledged, Some(now));
    }

    #[tokio::test]
    async fn test_dismiss_all_empties_due_set() {
        let (store, engine, now) = fixture();
        let due = engine.scan(now).await.unwrap();
        assert_eq!(due.len(), 3);

        let refreshed = engine.dismiss_all(&due, now).await.unwrap();
        assert!(refreshed.is_empty());

        // Every timestamp advanced to the same instant, dispositions kept.
        let stored = store.load_all().await.unwrap();
        for item in &stored {
            assert_eq!(item.status, Disposition::Owned);
            assert_eq!(item.reminder.as_ref().unwrap().last_acknowledged, Some(now));
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_item_due() {
        let (store, engine, now) = fixture();
        let due = engine.scan(now).await.unwrap();
        store.fail_writes();

        let err = engine.snooze(due[0].id, now).await.unwrap_err();
        assert!(err.is_write_error());

        // The write did not persist; the item is still due on the next scan.
        let rescan = engine.scan(now).await.unwrap();
        assert_eq!(rescan.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_batch_write_leaves_due_set_intact() {
        let (store, engine, now) = fixture();
        let due = engine.scan(now).await.unwrap();
        store.fail_writes();

        let err = engine.dismiss_all(&due, now).await.unwrap_err();
        assert!(err.is_write_error());
        assert_eq!(engine.scan(now).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_reentry_while_in_flight_is_ignored() {
        let (store, engine, now) = fixture();
        let engine = Arc::new(engine);
        let due = engine.scan(now).await.unwrap();
        let id = due[0].id;

        store.gate_writes();
        let pending = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.snooze(id, now).await })
        };

        // Wait until the first write is inside the store, then re-submit.
        let _entered = store.entered.acquire().await.unwrap();
        let refreshed = engine.snooze(id, now).await.unwrap();
        // The re-entry issued no second write and the item is still due.
        assert_eq!(store.update_calls.load(Ordering::SeqCst), 1);
        assert!(refreshed.iter().any(|item| item.id == id));

        store.release.add_permits(1);
        let final_set = pending.await.unwrap().unwrap();
        assert!(final_set.iter().all(|item| item.id != id));
    }

    #[tokio::test]
    async fn test_unknown_id_surfaces_not_found() {
        let (_store, engine, now) = fixture();
        let err = engine.snooze(Uuid::new_v4(), now).await.unwrap_err();
        assert!(matches!(err, CurioError::NotFound { .. }));
    }
}
