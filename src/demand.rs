use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::ResourceItem;

/// Probability that a freshly generated slot carries a non-zero booked count.
const OCCUPIED_PROBABILITY: f64 = 0.3;

/// Synthetic demand source for slot generation.
///
/// Generated calendars are demo/bootstrap data, not a reservation history, so
/// the default model is intentionally random. The model is an explicit
/// argument of generation rather than a hidden side effect, which keeps tests
/// deterministic and read paths free of surprises.
pub trait DemandModel {
    /// Initial booked count for one item on one day.
    ///
    /// Values above `item.capacity` are clamped by the generator.
    fn booked(&mut self, item: &ResourceItem, date: NaiveDate) -> u32;
}

/// With probability 0.3 a uniform draw in `[0, capacity]` inclusive, else 0.
pub struct RandomDemand {
    rng: StdRng,
}

impl RandomDemand {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed-seed variant for reproducible calendars.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDemand {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandModel for RandomDemand {
    fn booked(&mut self, item: &ResourceItem, _date: NaiveDate) -> u32 {
        if self.rng.gen::<f64>() < OCCUPIED_PROBABILITY {
            self.rng.gen_range(0..=item.capacity)
        } else {
            0
        }
    }
}

/// Every slot starts with the same booked count. Useful for tests and for
/// bootstrapping an entirely empty calendar with `FixedDemand(0)`.
pub struct FixedDemand(pub u32);

impl DemandModel for FixedDemand {
    fn booked(&mut self, item: &ResourceItem, _date: NaiveDate) -> u32 {
        self.0.min(item.capacity)
    }
}
