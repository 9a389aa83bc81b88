use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Venue zone a furniture item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Pool,
    Vip,
    Garden,
}

/// A bookable physical unit (bed, table, cabana) with capacity and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceItem {
    pub id: String,
    pub name: String,
    pub area: Area,
    /// Max simultaneous occupants/units.
    pub capacity: u32,
    /// Currency minor units.
    pub base_price: i64,
    pub is_active: bool,
}

/// Composite slot identity: one furniture item on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub furniture_id: String,
    pub date: NaiveDate,
}

impl SlotKey {
    pub fn new(furniture_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            furniture_id: furniture_id.into(),
            date,
        }
    }
}

/// One furniture/date pairing with its own capacity and booking counter.
///
/// Name/area/capacity are denormalized copies taken at generation time; they
/// may drift from the catalog item if it is edited later (accepted staleness,
/// no cascade update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: String,
    pub date: NaiveDate,
    pub furniture_id: String,
    pub furniture_name: String,
    pub area: Area,
    pub capacity: u32,
    /// Invariant: `0 <= booked <= capacity`.
    pub booked: u32,
    /// Currency minor units, multiplier schedule already applied.
    pub price: i64,
    pub is_available: bool,
}

impl AvailabilitySlot {
    /// Slot identity string: `{furnitureId}-{YYYY-MM-DD}`.
    pub fn slot_id(furniture_id: &str, date: NaiveDate) -> String {
        format!("{furniture_id}-{date}")
    }

    pub fn key(&self) -> SlotKey {
        SlotKey {
            furniture_id: self.furniture_id.clone(),
            date: self.date,
        }
    }
}

/// How Release sets the availability flag after decrementing.
///
/// The original system unconditionally marked released slots available, even
/// though the flag is otherwise derived from `booked < capacity`. Callers may
/// depend on either reading, so both are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    /// A released slot is always marked available (original behavior).
    #[default]
    ForceAvailable,
    /// Recompute `booked < capacity` after the decrement.
    Recompute,
}

impl std::str::FromStr for ReleaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force-available" => Ok(ReleaseMode::ForceAvailable),
            "recompute" => Ok(ReleaseMode::Recompute),
            other => Err(format!("unknown release mode: {other}")),
        }
    }
}

/// The event types — flat, no nesting. This is the WAL record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    ItemSeeded {
        item: ResourceItem,
    },
    SlotGenerated {
        slot: AvailabilitySlot,
    },
    SlotBooked {
        furniture_id: String,
        date: NaiveDate,
    },
    SlotReleased {
        furniture_id: String,
        date: NaiveDate,
    },
}
