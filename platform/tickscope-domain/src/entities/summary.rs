use crate::value_objects::tick::Tick;
use serde::Serialize;

/// Statistics of one side (buy or sell) of the tape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideSummary {
    pub count: usize,
    pub sum_price: f64,
    pub max_price: f64,
    pub min_price: f64,
    pub sum_volume: f64,
    pub max_volume: f64,
    pub min_volume: f64,
    pub sum_amount: f64,
    pub max_amount: f64,
    pub min_amount: f64,
    pub last_tick: Tick,
    pub lot_size: Option<i64>,
}

impl SideSummary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn avg_price(&self) -> f64 {
        self.average(self.sum_price)
    }

    pub fn avg_volume(&self) -> f64 {
        self.average(self.sum_volume)
    }

    pub fn avg_amount(&self) -> f64 {
        self.average(self.sum_amount)
    }

    /// Volume-weighted price per share: `sum_amount / sum_volume / lot_size`.
    pub fn amount_per_lot_price(&self) -> Option<f64> {
        let lot_size = self.lot_size?;
        if self.sum_volume == 0.0 || lot_size == 0 {
            return None;
        }
        Some(self.sum_amount / self.sum_volume / lot_size as f64)
    }

    fn average(&self, sum: f64) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            sum / self.count as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketSummary {
    pub buy: SideSummary,
    pub sell: SideSummary,
}

impl MarketSummary {
    pub fn total_count(&self) -> usize {
        self.buy.count + self.sell.count
    }
}
