use crate::model::{Area, ResourceItem};

fn item(id: &str, name: &str, area: Area, capacity: u32, base_price: i64) -> ResourceItem {
    ResourceItem {
        id: id.into(),
        name: name.into(),
        area,
        capacity,
        base_price,
        is_active: true,
    }
}

/// The fixed seed catalog: twelve bookable units across three venue zones.
///
/// Written to storage exactly once, the first time the inventory is observed
/// empty. Later inventory edits happen outside this core and never flow back
/// into already-generated slots.
pub fn seed_catalog() -> Vec<ResourceItem> {
    vec![
        item("party-bed-1", "PARTY bed A1", Area::Pool, 6, 2_000_000),
        item("party-bed-2", "PARTY bed A2", Area::Pool, 6, 2_000_000),
        item("party-bed-3", "PARTY bed A3", Area::Pool, 6, 2_000_000),
        item("party-super-1", "Party Super Bed B1", Area::Pool, 10, 3_500_000),
        item("party-super-2", "Party Super Bed B2", Area::Pool, 10, 3_500_000),
        item("vip-bed-1", "VIP BED 1", Area::Vip, 6, 2_500_000),
        item("vip-bed-2", "VIP BED 2", Area::Vip, 6, 2_500_000),
        item("vip-cabana-1", "VIP CABANA 1", Area::Vip, 15, 12_500_000),
        item("garden-table-1", "Garden Table 1", Area::Garden, 8, 1_000_000),
        item("garden-table-2", "Garden Table 2", Area::Garden, 8, 1_000_000),
        item("garden-bed-1", "Garden Bed 1", Area::Garden, 6, 1_500_000),
        item("garden-bed-2", "Garden Bed 2", Area::Garden, 6, 1_500_000),
    ]
}
