use crate::entities::summary::{MarketSummary, SideSummary};
use crate::value_objects::side::Side;
use crate::value_objects::tick::Tick;

/// Splits ticks by side and summarizes each; neutral prints are ignored.
pub fn summarize(ticks: &[Tick]) -> MarketSummary {
    MarketSummary {
        buy: summarize_side(ticks.iter().filter(|t| t.side == Side::Buy)),
        sell: summarize_side(ticks.iter().filter(|t| t.side == Side::Sell)),
    }
}

/// One pass over `ticks`. Extrema are seeded with the first element.
pub fn summarize_side<'a, I>(ticks: I) -> SideSummary
where
    I: IntoIterator<Item = &'a Tick>,
{
    let mut iter = ticks.into_iter();
    let Some(first) = iter.next() else {
        return SideSummary::default();
    };

    let mut summary = SideSummary {
        count: 1,
        sum_price: first.price,
        max_price: first.price,
        min_price: first.price,
        sum_volume: first.volume,
        max_volume: first.volume,
        min_volume: first.volume,
        sum_amount: first.amount,
        max_amount: first.amount,
        min_amount: first.amount,
        last_tick: first.clone(),
        lot_size: first.lot_size(),
    };
    let mut last = first;

    for tick in iter {
        summary.count += 1;
        summary.sum_price += tick.price;
        summary.max_price = summary.max_price.max(tick.price);
        summary.min_price = summary.min_price.min(tick.price);
        summary.sum_volume += tick.volume;
        summary.max_volume = summary.max_volume.max(tick.volume);
        summary.min_volume = summary.min_volume.min(tick.volume);
        summary.sum_amount += tick.amount;
        summary.max_amount = summary.max_amount.max(tick.amount);
        summary.min_amount = summary.min_amount.min(tick.amount);
        if summary.lot_size.is_none() {
            summary.lot_size = tick.lot_size();
        }
        last = tick;
    }

    summary.last_tick = last.clone();
    summary
}
