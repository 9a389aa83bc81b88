use std::sync::Arc;

use tokio::sync::{oneshot, RwLock};
use tracing::info;

use crate::catalog::seed_catalog;
use crate::demand::DemandModel;
use crate::model::{AvailabilitySlot, Event, ResourceItem, SlotKey};

use super::generator::generate_slots;
use super::{apply_book, apply_release, Engine, EngineError, WalCommand};

impl Engine {
    /// Write the fixed catalog if the inventory is empty; otherwise return the
    /// existing inventory unchanged. Idempotent: the catalog is persisted
    /// exactly once per "empty" observation.
    pub async fn seed_inventory(&self) -> Result<Vec<ResourceItem>, EngineError> {
        let _guard = self.bootstrap_lock.lock().await;
        if !self.items.is_empty() {
            return Ok(self.inventory().await);
        }

        let catalog = seed_catalog();
        let events = catalog
            .iter()
            .map(|item| Event::ItemSeeded { item: item.clone() })
            .collect();
        self.wal_append(events).await?;

        let mut order = self.item_order.write().await;
        for item in &catalog {
            self.items.insert(item.id.clone(), item.clone());
            order.push(item.id.clone());
        }
        drop(order);

        info!("seeded {} catalog items", catalog.len());
        metrics::counter!(crate::observability::ITEMS_SEEDED_TOTAL)
            .increment(catalog.len() as u64);
        Ok(catalog)
    }

    /// Generate the 90-day calendar if no slots are persisted yet; returns the
    /// number of slots created (zero when slots already exist).
    ///
    /// Idempotent-by-absence: a partial or mutated set is never merged with or
    /// extended — once real bookings mutate state, the synthetic baseline is
    /// frozen.
    pub async fn generate_availability(
        &self,
        demand: &mut (dyn DemandModel + Send),
    ) -> Result<usize, EngineError> {
        let _guard = self.bootstrap_lock.lock().await;
        if !self.slots.is_empty() {
            return Ok(0);
        }

        let items = self.inventory().await;
        let start = chrono::Utc::now().date_naive();
        let slots = generate_slots(&items, start, demand);

        let events = slots
            .iter()
            .map(|slot| Event::SlotGenerated { slot: slot.clone() })
            .collect();
        self.wal_append(events).await?;

        let count = slots.len();
        for slot in slots {
            self.slots
                .insert(slot.key(), Arc::new(RwLock::new(slot)));
        }

        info!("generated {count} availability slots from {start}");
        metrics::counter!(crate::observability::SLOTS_GENERATED_TOTAL).increment(count as u64);
        Ok(count)
    }

    /// Seed + generate, each idempotent-by-absence. This is the explicit
    /// bootstrap operation; read paths never trigger it. Returns
    /// (inventory size, slots newly generated).
    pub async fn bootstrap(
        &self,
        demand: &mut (dyn DemandModel + Send),
    ) -> Result<(usize, usize), EngineError> {
        let items = self.seed_inventory().await?;
        let generated = self.generate_availability(demand).await?;
        Ok((items.len(), generated))
    }

    /// Book one unit of a slot. Fails with `SlotNotFound` for an absent key
    /// and `Conflict` when the slot is not available.
    pub async fn book(&self, key: &SlotKey) -> Result<AvailabilitySlot, EngineError> {
        let slot = self
            .get_slot(key)
            .ok_or_else(|| EngineError::slot_not_found(key))?;
        let mut guard = slot.write().await;

        if !guard.is_available {
            metrics::counter!(crate::observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(EngineError::conflict(key));
        }

        self.wal_append(vec![Event::SlotBooked {
            furniture_id: key.furniture_id.clone(),
            date: key.date,
        }])
        .await?;
        apply_book(&mut guard);

        metrics::counter!(crate::observability::BOOKINGS_TOTAL).increment(1);
        Ok(guard.clone())
    }

    /// Release one unit of a slot. The booked count floors at zero; the
    /// availability flag follows the engine's `ReleaseMode`.
    pub async fn release(&self, key: &SlotKey) -> Result<AvailabilitySlot, EngineError> {
        let slot = self
            .get_slot(key)
            .ok_or_else(|| EngineError::slot_not_found(key))?;
        let mut guard = slot.write().await;

        self.wal_append(vec![Event::SlotReleased {
            furniture_id: key.furniture_id.clone(),
            date: key.date,
        }])
        .await?;
        apply_release(&mut guard, self.release_mode);

        metrics::counter!(crate::observability::RELEASES_TOTAL).increment(1);
        Ok(guard.clone())
    }

    /// Rewrite the WAL as the minimal event set recreating current state:
    /// items in catalog order, then one `SlotGenerated` per slot carrying its
    /// current booked count. Book/release churn folds away.
    pub async fn compact_wal(&self) -> Result<(), EngineError> {
        let mut events = Vec::with_capacity(self.items.len() + self.slots.len());
        for item in self.inventory().await {
            events.push(Event::ItemSeeded { item });
        }
        for slot in self.list_slots().await {
            events.push(Event::SlotGenerated { slot });
        }

        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Compact {
                events,
                response: tx,
            })
            .await
            .map_err(|_| EngineError::Storage("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::Storage("WAL writer dropped response".into()))?
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    pub async fn wal_appends_since_compact(&self) -> u64 {
        let (tx, rx) = oneshot::channel();
        if self
            .wal_tx
            .send(WalCommand::AppendsSinceCompact { response: tx })
            .await
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}
