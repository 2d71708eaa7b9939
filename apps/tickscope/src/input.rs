use chrono::{NaiveTime, Timelike};

/// Parses `HH:MM` or `HH:MM:SS` into seconds since midnight.
pub fn parse_time_of_day(raw: &str) -> Result<u32, String> {
    let value = raw.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map(|time| time.num_seconds_from_midnight())
        .map_err(|_| format!("invalid time of day: '{raw}' (expected HH:MM or HH:MM:SS)"))
}

/// Checks the raw query arguments and returns the window in seconds.
pub fn validate_query_args(
    code: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<u32>, Option<u32>), String> {
    if code.trim().is_empty() {
        return Err("security code must not be empty".to_string());
    }
    let start = start.map(parse_time_of_day).transpose()?;
    let end = end.map(parse_time_of_day).transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err("start time must be earlier than end time".to_string());
        }
    }
    Ok((start, end))
}
