use serde::Serialize;

pub const SECONDS_PER_DAY: u32 = 86_400;
pub const DEFAULT_MAX_PAGE: u32 = 100;

/// Page-start times of one trading session in seconds since midnight,
/// terminated by the end-of-day sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBoundary {
    seconds: Vec<u32>,
}

impl TimeBoundary {
    pub fn new(seconds: Vec<u32>) -> Result<Self, String> {
        if seconds.len() < 2 {
            return Err(format!(
                "time boundary needs at least 2 entries, got {}",
                seconds.len()
            ));
        }
        if let Some(pos) = seconds.windows(2).position(|pair| pair[0] > pair[1]) {
            return Err(format!(
                "time boundary is decreasing at index {}: {} > {}",
                pos + 1,
                seconds[pos],
                seconds[pos + 1]
            ));
        }
        Ok(Self { seconds })
    }

    /// A day without any trading segment: only the end-of-day sentinel, so no
    /// second resolves to a page.
    pub fn empty_session() -> Self {
        Self {
            seconds: vec![SECONDS_PER_DAY],
        }
    }

    pub fn is_empty_session(&self) -> bool {
        self.seconds.len() < 2
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.seconds
    }

    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }
}

/// Inclusive range of page indices to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start_page: u32,
    pub end_page: u32,
}

impl PageRange {
    pub fn new(start_page: u32, end_page: u32) -> Self {
        Self {
            start_page,
            end_page,
        }
    }

    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start_page..=self.end_page
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self::new(0, DEFAULT_MAX_PAGE)
    }
}

/// Optional time-of-day filter, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeWindow {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl TimeWindow {
    pub fn new(start: Option<u32>, end: Option<u32>) -> Self {
        Self { start, end }
    }

    pub fn whole_day() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, second: u32) -> bool {
        let start = self.start.unwrap_or(0);
        let end = self.end.unwrap_or(SECONDS_PER_DAY);
        start <= second && second <= end
    }
}

pub fn format_seconds(second: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        second / 3600,
        (second % 3600) / 60,
        second % 60
    )
}
