use crate::errors::QueryError;
use crate::repositories::page_source::{PageAction, PageSource};
use crate::services::codec::{decode_envelope, time_to_seconds};
use crate::value_objects::session::{PageRange, TimeBoundary, TimeWindow, SECONDS_PER_DAY};

/// Fetches page 0 of the boundary manifest and decodes it.
pub fn fetch_session_boundaries(
    source: &dyn PageSource,
    symbol: &str,
) -> Result<TimeBoundary, QueryError> {
    let raw = source.fetch_page(symbol, 0, PageAction::Boundaries)?;
    let payload = decode_envelope(&raw)?;
    parse_boundaries(payload)
}

/// Parses `start~end|start~end|...` into page-start seconds.
///
/// Only each segment's start is kept, followed by the last segment's end and
/// the end-of-day sentinel. Pauses such as the lunch break show up as a jump
/// between consecutive starts. A manifest without segments is a day with no
/// session.
pub fn parse_boundaries(payload: &str) -> Result<TimeBoundary, QueryError> {
    let mut seconds = Vec::new();
    let mut last_end = None;

    for segment in payload.split('|') {
        if segment.trim().is_empty() {
            continue;
        }
        let (start, end) = segment.split_once('~').ok_or_else(|| {
            QueryError::MalformedResponse(format!("boundary segment without '~': {segment}"))
        })?;
        let start = time_to_seconds(start).map_err(|err| {
            QueryError::MalformedResponse(format!("boundary segment '{segment}': {err}"))
        })?;
        let end = time_to_seconds(end).map_err(|err| {
            QueryError::MalformedResponse(format!("boundary segment '{segment}': {err}"))
        })?;
        seconds.push(start);
        last_end = Some(end);
    }

    let Some(last_end) = last_end else {
        return Ok(TimeBoundary::empty_session());
    };
    seconds.push(last_end);
    seconds.push(SECONDS_PER_DAY);

    TimeBoundary::new(seconds).map_err(QueryError::MalformedResponse)
}

/// Greatest page `i` with `boundaries[i] <= second <= boundaries[i + 1]`.
///
/// Boundaries are sorted, so the scan stops at the first start past `second`.
/// `None` means the second lies before the session opens.
pub fn resolve_page(boundaries: &TimeBoundary, second: u32) -> Option<usize> {
    let bounds = boundaries.as_slice();
    let mut found = None;
    for (idx, pair) in bounds.windows(2).enumerate() {
        if second < pair[0] {
            break;
        }
        if second <= pair[1] {
            found = Some(idx);
        }
    }
    found
}

/// Turns a time window into the pages worth fetching.
///
/// An unresolved start falls back to page 0 (from session open). An end that
/// was asked for but falls before the session means there is nothing to fetch.
pub fn resolve_range(
    boundaries: &TimeBoundary,
    window: TimeWindow,
    max_page: u32,
) -> Result<PageRange, QueryError> {
    let start_page = window
        .start
        .and_then(|second| resolve_page(boundaries, second))
        .map(|page| page as u32)
        .unwrap_or(0);

    let end_page = match window.end {
        Some(second) => match resolve_page(boundaries, second) {
            Some(page) => page as u32,
            None => return Err(QueryError::no_data()),
        },
        None => max_page,
    };

    Ok(PageRange::new(start_page, end_page.min(max_page)))
}
