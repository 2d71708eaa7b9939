use crate::errors::{FieldParseError, QueryError};
use crate::repositories::page_source::{PageAction, PageSource};
use crate::services::codec::{decode_envelope, parse_records};
use crate::value_objects::session::{PageRange, TimeWindow};
use crate::value_objects::tick::Tick;
use serde::Serialize;
use std::thread;
use std::time::Duration;

pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub page: u32,
    pub ticks: usize,
    pub notices: usize,
}

/// The error that stopped the page loop and the page it happened on.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFailure {
    pub page: u32,
    pub error: QueryError,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FetchOutcome {
    pub ticks: Vec<Tick>,
    pub notices: Vec<FieldParseError>,
    pub pages: Vec<PageReport>,
    /// Set when a page returned an empty body before the range was exhausted.
    pub reached_end: bool,
    pub halted: Option<PageFailure>,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.halted.is_none()
    }
}

/// Fetches `range` page by page and decodes every page into window-filtered ticks.
///
/// Pages are fetched strictly in order with `page_delay` between requests. An
/// empty body ends the loop normally. The first page-level error (transport,
/// status or envelope) is stored in `halted` and ends the loop; later pages are
/// not attempted. Record-level problems only add to `notices`.
pub fn query_range(
    source: &dyn PageSource,
    symbol: &str,
    range: PageRange,
    window: TimeWindow,
    page_delay: Duration,
) -> FetchOutcome {
    let mut outcome = FetchOutcome::default();

    for page in range.pages() {
        if page != range.start_page && !page_delay.is_zero() {
            thread::sleep(page_delay);
        }

        let raw = match source.fetch_page(symbol, page, PageAction::Data) {
            Ok(raw) => raw,
            Err(error) => {
                outcome.halted = Some(PageFailure { page, error });
                break;
            }
        };

        if raw.trim().is_empty() {
            outcome.reached_end = true;
            break;
        }

        let payload = match decode_envelope(&raw) {
            Ok(payload) => payload,
            Err(error) => {
                outcome.halted = Some(PageFailure { page, error });
                break;
            }
        };

        let parsed = parse_records(payload, window);
        outcome.pages.push(PageReport {
            page,
            ticks: parsed.ticks.len(),
            notices: parsed.notices.len(),
        });
        outcome.ticks.extend(parsed.ticks);
        outcome.notices.extend(parsed.notices);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::query_range;
    use crate::errors::QueryError;
    use crate::repositories::page_source::{PageAction, PageSource};
    use crate::value_objects::session::{PageRange, TimeWindow};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    struct ScriptedSource {
        pages: HashMap<u32, Result<String, QueryError>>,
        requested: RefCell<Vec<u32>>,
        called_at: RefCell<Vec<Instant>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<(u32, Result<String, QueryError>)>) -> Self {
            Self {
                pages: pages.into_iter().collect(),
                requested: RefCell::new(Vec::new()),
                called_at: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for ScriptedSource {
        fn fetch_page(
            &self,
            _symbol: &str,
            page: u32,
            action: PageAction,
        ) -> Result<String, QueryError> {
            assert_eq!(action, PageAction::Data);
            self.requested.borrow_mut().push(page);
            self.called_at.borrow_mut().push(Instant::now());
            self.pages
                .get(&page)
                .cloned()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn body(records: &str) -> Result<String, QueryError> {
        Ok(format!("v_detail_data_sh600000=[1,\"{records}\"]"))
    }

    #[test]
    fn stops_on_empty_body_without_error() {
        let source = ScriptedSource::new(vec![
            (0, body("1/09:30:01/10.5/0/1/1050/B")),
            (1, body("2/09:30:02/10.4/0/2/2080/S")),
        ]);
        let outcome = query_range(
            &source,
            "sh600000",
            PageRange::default(),
            TimeWindow::whole_day(),
            Duration::ZERO,
        );
        assert_eq!(outcome.ticks.len(), 2);
        assert!(outcome.reached_end);
        assert!(outcome.is_complete());
        assert_eq!(*source.requested.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn halts_on_http_error_and_keeps_earlier_pages() {
        let source = ScriptedSource::new(vec![
            (0, body("1/09:30:01/10.5/0/1/1050/B")),
            (1, body("2/09:30:02/10.4/0/2/2080/S")),
            (2, Err(QueryError::HttpStatus { code: 404 })),
            (3, body("3/09:30:03/10.4/0/2/2080/S")),
        ]);
        let outcome = query_range(
            &source,
            "sh600000",
            PageRange::new(0, 10),
            TimeWindow::whole_day(),
            Duration::ZERO,
        );
        assert_eq!(outcome.ticks.len(), 2);
        let failure = outcome.halted.expect("halted");
        assert_eq!(failure.page, 2);
        assert_eq!(failure.error, QueryError::HttpStatus { code: 404 });
        assert_eq!(*source.requested.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn halts_on_malformed_envelope() {
        let source = ScriptedSource::new(vec![
            (3, body("1/09:30:01/10.5/0/1/1050/B")),
            (4, Ok("<html>busy</html>".to_string())),
        ]);
        let outcome = query_range(
            &source,
            "sh600000",
            PageRange::new(3, 6),
            TimeWindow::whole_day(),
            Duration::ZERO,
        );
        assert_eq!(outcome.ticks.len(), 1);
        assert!(matches!(
            outcome.halted.map(|f| f.error),
            Some(QueryError::MalformedResponse(_))
        ));
        assert_eq!(*source.requested.borrow(), vec![3, 4]);
    }

    #[test]
    fn respects_end_page_and_keeps_going_past_filtered_pages() {
        let source = ScriptedSource::new(vec![
            (0, body("1/09:25:00/10.5/0/1/1050/B")),
            (1, body("2/10:00:00/10.4/0/2/2080/S|oops")),
            (2, body("3/10:30:00/10.4/0/2/2080/S")),
        ]);
        let outcome = query_range(
            &source,
            "sh600000",
            PageRange::new(0, 1),
            TimeWindow::new(Some(36_000), None),
            Duration::ZERO,
        );
        assert_eq!(outcome.ticks.len(), 1);
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.pages.len(), 2);
        assert!(!outcome.reached_end);
        assert_eq!(*source.requested.borrow(), vec![0, 1]);
    }

    #[test]
    fn sleeps_between_pages_only() {
        let delay = Duration::from_millis(40);
        let source = ScriptedSource::new(vec![
            (5, body("1/09:30:01/10.5/0/1/1050/B")),
            (6, body("2/09:30:02/10.4/0/2/2080/S")),
        ]);

        let started = Instant::now();
        let outcome = query_range(
            &source,
            "sh600000",
            PageRange::new(5, 20),
            TimeWindow::whole_day(),
            delay,
        );
        let finished = Instant::now();

        assert!(outcome.reached_end);
        assert_eq!(*source.requested.borrow(), vec![5, 6, 7]);

        let calls = source.called_at.borrow();
        assert!(calls[0].duration_since(started) < delay, "slept before the first page");
        for pair in calls.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= delay);
        }
        assert!(
            finished.duration_since(calls[2]) < delay,
            "slept after the empty page"
        );
    }
}
