use chrono::{Duration, NaiveDate};

use crate::demand::DemandModel;
use crate::model::{AvailabilitySlot, ResourceItem};

use super::pricing::slot_price;

/// Forward window, in days, for which slots are generated.
pub const HORIZON_DAYS: i64 = 90;

/// Expand the catalog into one slot per active item per day over the horizon
/// starting at `start` (day offsets `0..HORIZON_DAYS`).
///
/// Inactive items never produce a slot. Output order is day-major, catalog
/// order within each day. Demand comes from the pluggable model; anything it
/// returns above capacity is clamped.
pub fn generate_slots(
    items: &[ResourceItem],
    start: NaiveDate,
    demand: &mut (dyn DemandModel + Send),
) -> Vec<AvailabilitySlot> {
    let mut slots = Vec::with_capacity(items.len() * HORIZON_DAYS as usize);
    for offset in 0..HORIZON_DAYS {
        let date = start + Duration::days(offset);
        for item in items.iter().filter(|i| i.is_active) {
            let booked = demand.booked(item, date).min(item.capacity);
            slots.push(AvailabilitySlot {
                id: AvailabilitySlot::slot_id(&item.id, date),
                date,
                furniture_id: item.id.clone(),
                furniture_name: item.name.clone(),
                area: item.area,
                capacity: item.capacity,
                booked,
                price: slot_price(item.base_price, date),
                is_available: booked < item.capacity,
            });
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_catalog;
    use crate::demand::{FixedDemand, RandomDemand};
    use crate::model::Area;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    #[test]
    fn covers_horizon_times_active_items() {
        let items = seed_catalog();
        let slots = generate_slots(&items, start(), &mut FixedDemand(0));
        assert_eq!(slots.len(), 90 * items.len());
    }

    #[test]
    fn inactive_items_produce_no_slots() {
        let mut items = seed_catalog();
        items[0].is_active = false;
        items[7].is_active = false;
        let slots = generate_slots(&items, start(), &mut FixedDemand(0));
        assert_eq!(slots.len(), 90 * (items.len() - 2));
        assert!(slots.iter().all(|s| s.furniture_id != items[0].id));
        assert!(slots.iter().all(|s| s.furniture_id != items[7].id));
    }

    #[test]
    fn order_is_day_major_then_catalog_order() {
        let items = seed_catalog();
        let slots = generate_slots(&items, start(), &mut FixedDemand(0));

        for (day, chunk) in slots.chunks(items.len()).enumerate() {
            let date = start() + Duration::days(day as i64);
            for (item, slot) in items.iter().zip(chunk) {
                assert_eq!(slot.date, date);
                assert_eq!(slot.furniture_id, item.id);
            }
        }
    }

    #[test]
    fn slots_carry_denormalized_item_fields() {
        let items = seed_catalog();
        let slots = generate_slots(&items, start(), &mut FixedDemand(0));
        let cabana = slots
            .iter()
            .find(|s| s.furniture_id == "vip-cabana-1")
            .unwrap();
        assert_eq!(cabana.furniture_name, "VIP CABANA 1");
        assert_eq!(cabana.area, Area::Vip);
        assert_eq!(cabana.capacity, 15);
        assert_eq!(cabana.id, format!("vip-cabana-1-{}", cabana.date));
    }

    #[test]
    fn prices_follow_the_multiplier_schedule() {
        let items = seed_catalog();
        let slots = generate_slots(&items, start(), &mut FixedDemand(0));
        for slot in &slots {
            let item = items.iter().find(|i| i.id == slot.furniture_id).unwrap();
            assert_eq!(slot.price, slot_price(item.base_price, slot.date));
        }
    }

    #[test]
    fn booked_is_clamped_and_flag_is_derived() {
        let items = seed_catalog();
        let full = generate_slots(&items, start(), &mut FixedDemand(u32::MAX));
        for slot in &full {
            assert_eq!(slot.booked, slot.capacity);
            assert!(!slot.is_available);
        }

        let mut random = RandomDemand::seeded(11);
        let mixed = generate_slots(&items, start(), &mut random);
        for slot in &mixed {
            assert!(slot.booked <= slot.capacity);
            assert_eq!(slot.is_available, slot.booked < slot.capacity);
        }
    }
}
