use std::collections::HashMap;

use crate::model::{AvailabilitySlot, ResourceItem};

use super::{Engine, SharedSlot};

impl Engine {
    /// Inventory in catalog order. Side-effect-free; seeding is a separate
    /// bootstrap operation.
    pub async fn inventory(&self) -> Vec<ResourceItem> {
        let order = self.item_order.read().await;
        order
            .iter()
            .filter_map(|id| self.items.get(id).map(|e| e.value().clone()))
            .collect()
    }

    /// Full slot collection, day-major, catalog order within each day —
    /// the same order generation produced.
    pub async fn list_slots(&self) -> Vec<AvailabilitySlot> {
        let order = self.item_order.read().await;
        let rank: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        // Clone the Arcs out first so no DashMap shard lock is held across await.
        let shared: Vec<SharedSlot> = self.slots.iter().map(|e| e.value().clone()).collect();
        let mut slots = Vec::with_capacity(shared.len());
        for slot in shared {
            slots.push(slot.read().await.clone());
        }

        slots.sort_by(|a, b| {
            a.date.cmp(&b.date).then_with(|| {
                let ra = rank.get(a.furniture_id.as_str()).copied().unwrap_or(usize::MAX);
                let rb = rank.get(b.furniture_id.as_str()).copied().unwrap_or(usize::MAX);
                ra.cmp(&rb)
            })
        });
        slots
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
