use crate::reporting::{render_report, ReportInput, ReportLocale};
use serde::Serialize;
use std::time::{Duration, Instant};
use tickscope_domain::entities::summary::MarketSummary;
use tickscope_domain::errors::QueryError;
use tickscope_domain::repositories::history::HistoryStore;
use tickscope_domain::repositories::page_source::PageSource;
use tickscope_domain::services::aggregator::summarize;
use tickscope_domain::services::fetcher::{query_range, PageFailure, PageReport, DEFAULT_PAGE_DELAY};
use tickscope_domain::services::page_index::{fetch_session_boundaries, resolve_range};
use tickscope_domain::value_objects::security::SecurityCode;
use tickscope_domain::value_objects::session::{PageRange, TimeWindow, DEFAULT_MAX_PAGE};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub security_code: String,
    /// Seconds since midnight.
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl QueryRequest {
    pub fn new(security_code: impl Into<String>) -> Self {
        Self {
            security_code: security_code.into(),
            start: None,
            end: None,
        }
    }

    pub fn with_window(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub max_pages: u32,
    pub page_delay: Duration,
    pub locale: ReportLocale,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGE,
            page_delay: DEFAULT_PAGE_DELAY,
            locale: ReportLocale::default(),
        }
    }
}

/// Page-level failure that cut the fetch short, flattened for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HaltedPage {
    pub page: u32,
    pub kind: &'static str,
    pub message: String,
}

impl From<&PageFailure> for HaltedPage {
    fn from(failure: &PageFailure) -> Self {
        Self {
            page: failure.page,
            kind: failure.error.kind(),
            message: failure.error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub code: SecurityCode,
    pub window: TimeWindow,
    pub range: PageRange,
    pub pages: Vec<PageReport>,
    pub tick_count: usize,
    pub summary: MarketSummary,
    pub notices: Vec<String>,
    pub halted: Option<HaltedPage>,
    /// History after this query was recorded, most recent first.
    pub history: Vec<String>,
    pub locale: ReportLocale,
    pub text: String,
}

impl QueryReport {
    pub fn is_complete(&self) -> bool {
        self.halted.is_none()
    }
}

/// Runs one batch query: resolve pages, fetch, summarize, render, record history.
///
/// Page errors stop the fetch but whatever was gathered before them is still
/// reported, with `halted` set. The query only fails when nothing was gathered.
pub fn run_query(
    source: &dyn PageSource,
    history: &dyn HistoryStore,
    request: &QueryRequest,
    options: &QueryOptions,
) -> Result<QueryReport, QueryError> {
    let start = Instant::now();
    let result = execute(source, history, request, options);
    let elapsed_ms = start.elapsed().as_millis() as f64;

    match &result {
        Ok(report) => {
            let outcome = if report.is_complete() { "ok" } else { "partial" };
            metrics::counter!("tickscope.app.queries_total", "result" => outcome).increment(1);
            metrics::histogram!("tickscope.app.query_ms", "result" => outcome).record(elapsed_ms);
            tracing::info!(
                code = %report.code.raw,
                ticks = report.tick_count,
                pages = report.pages.len(),
                complete = report.is_complete(),
                "query finished"
            );
        }
        Err(err) => {
            metrics::counter!(
                "tickscope.app.queries_total",
                "result" => "err",
                "kind" => err.kind()
            )
            .increment(1);
            metrics::histogram!("tickscope.app.query_ms", "result" => "err").record(elapsed_ms);
            tracing::warn!(error = %err, kind = err.kind(), "query failed");
        }
    }

    result
}

fn execute(
    source: &dyn PageSource,
    history: &dyn HistoryStore,
    request: &QueryRequest,
    options: &QueryOptions,
) -> Result<QueryReport, QueryError> {
    let code = SecurityCode::parse(&request.security_code).map_err(QueryError::InvalidRequest)?;
    let window = TimeWindow::new(request.start, request.end);
    if let (Some(start), Some(end)) = (window.start, window.end) {
        if start > end {
            return Err(QueryError::InvalidRequest(format!(
                "start time must not be after end time ({start} > {end})"
            )));
        }
    }

    let span = tracing::info_span!(
        "app.query",
        code = %code.raw,
        symbol = %code.symbol,
        start = ?window.start,
        end = ?window.end,
        max_pages = options.max_pages
    );
    let _enter = span.enter();

    let range = if window.is_unbounded() {
        PageRange::new(0, options.max_pages)
    } else {
        let boundaries = fetch_session_boundaries(source, &code.symbol)?;
        tracing::debug!(boundaries = boundaries.len(), "session boundaries loaded");
        resolve_range(&boundaries, window, options.max_pages)?
    };
    tracing::debug!(
        start_page = range.start_page,
        end_page = range.end_page,
        "resolved page range"
    );

    let outcome = query_range(source, &code.symbol, range, window, options.page_delay);

    metrics::counter!("tickscope.app.records_parsed_total").increment(outcome.ticks.len() as u64);
    metrics::counter!("tickscope.app.records_skipped_total")
        .increment(outcome.notices.len() as u64);
    for notice in &outcome.notices {
        tracing::warn!(record = %notice.record, reason = %notice.reason, "skipped record");
    }
    if let Some(failure) = &outcome.halted {
        tracing::warn!(
            page = failure.page,
            error = %failure.error,
            "page fetch halted, report will be incomplete"
        );
    }

    if outcome.ticks.is_empty() {
        return Err(QueryError::NoDataAvailable {
            cause: outcome.halted.map(|failure| Box::new(failure.error)),
        });
    }

    let summary = summarize(&outcome.ticks);
    let text = render_report(
        &ReportInput {
            code: &code,
            window,
            range,
            pages_fetched: outcome.pages.len(),
            tick_count: outcome.ticks.len(),
            summary: &summary,
            skipped_records: outcome.notices.len(),
            halted: outcome.halted.as_ref(),
        },
        options.locale,
    );

    let history = match history.record_query(&code.raw) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "failed to record query history");
            Vec::new()
        }
    };

    Ok(QueryReport {
        code,
        window,
        range,
        pages: outcome.pages,
        tick_count: outcome.ticks.len(),
        summary,
        notices: outcome.notices.iter().map(ToString::to_string).collect(),
        halted: outcome.halted.as_ref().map(HaltedPage::from),
        history,
        locale: options.locale,
        text,
    })
}
