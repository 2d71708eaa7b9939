use crate::value_objects::side::Side;
use serde::Serialize;

/// One trade print as reported by the detail feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Tick {
    pub sequence_index: i64,
    pub time_of_day: String,
    pub price: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub amount: f64,
    pub side: Side,
}

impl Tick {
    /// Nominal shares per lot, `round(amount / volume / price)`.
    ///
    /// The feed reports volume in lots and amount in currency, so the ratio
    /// recovers the lot size (usually 100). Returns `None` when volume or price
    /// is zero, or when the ratio is not a finite positive number.
    pub fn lot_size(&self) -> Option<i64> {
        if self.volume == 0.0 || self.price == 0.0 {
            return None;
        }
        let ratio = (self.amount / self.volume / self.price).round();
        if !ratio.is_finite() || ratio <= 0.0 {
            return None;
        }
        Some(ratio as i64)
    }
}
