use chrono::{Datelike, NaiveDate, Weekday};

const WEEKEND_MULTIPLIER: f64 = 1.2;
const PEAK_SEASON_MULTIPLIER: f64 = 1.3;

/// Composite price multiplier for a calendar day.
///
/// Weekends (Friday through Sunday) take ×1.2; peak season (December and
/// January) takes ×1.3. The two compose multiplicatively, so a December
/// Saturday is ×1.56.
pub fn price_multiplier(date: NaiveDate) -> f64 {
    let mut multiplier = 1.0;
    if matches!(date.weekday(), Weekday::Fri | Weekday::Sat | Weekday::Sun) {
        multiplier *= WEEKEND_MULTIPLIER;
    }
    if matches!(date.month(), 12 | 1) {
        multiplier *= PEAK_SEASON_MULTIPLIER;
    }
    multiplier
}

/// Day price in currency minor units, rounded half-up to the nearest unit.
pub fn slot_price(base_price: i64, date: NaiveDate) -> i64 {
    (base_price as f64 * price_multiplier(date)).round() as i64
}
