mod locale;

pub use locale::{Labels, Magnitude, ReportLocale};

use tickscope_domain::entities::summary::{MarketSummary, SideSummary};
use tickscope_domain::services::fetcher::PageFailure;
use tickscope_domain::services::table;
use tickscope_domain::value_objects::security::SecurityCode;
use tickscope_domain::value_objects::session::{format_seconds, PageRange, TimeWindow};

/// Everything the text report needs about one finished query.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub code: &'a SecurityCode,
    pub window: TimeWindow,
    pub range: PageRange,
    pub pages_fetched: usize,
    pub tick_count: usize,
    pub summary: &'a MarketSummary,
    pub skipped_records: usize,
    pub halted: Option<&'a PageFailure>,
}

/// Rows in `table::render` input form: plain header/footer lines around a
/// `Metric | Buy | Sell` block.
pub fn build_rows(input: &ReportInput<'_>, locale: ReportLocale) -> Vec<String> {
    let labels = locale.labels();
    let magnitude = locale.magnitude();
    let buy = &input.summary.buy;
    let sell = &input.summary.sell;

    let mut rows = Vec::new();
    rows.push(format!(
        "{}: {} ({})",
        labels.security, input.code.raw, input.code.symbol
    ));
    rows.push(format!(
        "{}: {} | {} {}-{} ({} fetched) | {} {}",
        labels.window,
        describe_window(input.window, labels),
        labels.pages,
        input.range.start_page,
        input.range.end_page,
        input.pages_fetched,
        input.tick_count,
        labels.ticks,
    ));
    rows.push(String::new());

    rows.push(table::pipe_row([labels.metric, labels.buy, labels.sell]));
    let mut metric = |label: &str, f: &dyn Fn(&SideSummary) -> String| {
        rows.push(table::pipe_row([label.to_string(), f(buy), f(sell)]));
    };

    metric(labels.count, &|s| s.count.to_string());
    metric(labels.avg_price, &|s| money(s.avg_price()));
    metric(labels.max_price, &|s| money(s.max_price));
    metric(labels.min_price, &|s| money(s.min_price));
    metric(labels.per_share_price, &|s| {
        s.amount_per_lot_price()
            .map(money)
            .unwrap_or_else(|| labels.not_available.to_string())
    });

    let total_volume = format!("{} ({})", labels.total_volume, magnitude.volume_unit);
    metric(total_volume.as_str(), &|s| money(s.sum_volume / magnitude.divisor));
    metric(labels.avg_volume, &|s| whole(s.avg_volume()));
    metric(labels.max_volume, &|s| whole(s.max_volume));
    metric(labels.min_volume, &|s| whole(s.min_volume));

    let total_amount = format!("{} ({})", labels.total_amount, magnitude.amount_unit);
    metric(total_amount.as_str(), &|s| money(s.sum_amount / magnitude.divisor));
    metric(labels.avg_amount, &|s| money(s.avg_amount()));
    metric(labels.max_amount, &|s| money(s.max_amount));
    metric(labels.min_amount, &|s| money(s.min_amount));

    metric(labels.last_time, &|s| {
        if s.is_empty() {
            labels.not_available.to_string()
        } else {
            s.last_tick.time_of_day.clone()
        }
    });
    metric(labels.last_price, &|s| money(s.last_tick.price));
    metric(labels.last_volume, &|s| whole(s.last_tick.volume));

    if input.skipped_records > 0 || input.halted.is_some() {
        rows.push(String::new());
    }
    if input.skipped_records > 0 {
        rows.push(format!("{}: {}", labels.skipped_records, input.skipped_records));
    }
    if let Some(failure) = input.halted {
        rows.push(format!(
            "{} {}: {}",
            labels.incomplete, failure.page, failure.error
        ));
    }

    rows
}

pub fn render_report(input: &ReportInput<'_>, locale: ReportLocale) -> String {
    table::render(&build_rows(input, locale))
}

fn describe_window(window: TimeWindow, labels: &Labels) -> String {
    if window.is_unbounded() {
        return labels.whole_session.to_string();
    }
    let start = window.start.map(format_seconds).unwrap_or_else(|| "00:00:00".to_string());
    let end = window.end.map(format_seconds).unwrap_or_else(|| "24:00:00".to_string());
    format!("{start} - {end}")
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn whole(value: f64) -> String {
    format!("{value:.0}")
}
