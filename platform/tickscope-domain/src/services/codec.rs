use crate::errors::{FieldParseError, QueryError};
use crate::value_objects::session::TimeWindow;
use crate::value_objects::side::Side;
use crate::value_objects::tick::Tick;

const RECORD_SEPARATOR: char = '|';
const FIELD_SEPARATOR: char = '/';
const FIELDS_PER_RECORD: usize = 7;

/// Ticks decoded from one page plus the records that had to be skipped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedPage {
    pub ticks: Vec<Tick>,
    pub notices: Vec<FieldParseError>,
}

/// Returns the first quoted segment of a raw feed body.
///
/// Bodies look like `v_detail_data_sh600000=[1,"<payload>"]`. A body without
/// `[` is an error page or an empty reply.
pub fn decode_envelope(raw: &str) -> Result<&str, QueryError> {
    if !raw.contains('[') {
        return Err(QueryError::MalformedResponse(
            "response has no '[' marker".to_string(),
        ));
    }
    let start = raw
        .find('"')
        .map(|idx| idx + 1)
        .ok_or_else(|| QueryError::MalformedResponse("response has no quoted payload".to_string()))?;
    let len = raw[start..].find('"').ok_or_else(|| {
        QueryError::MalformedResponse("response payload quote is not terminated".to_string())
    })?;
    Ok(&raw[start..start + len])
}

/// Splits a payload into ticks, keeping only records inside `window`.
///
/// Records with missing fields or unparsable values are skipped and reported
/// in `ParsedPage::notices`; the rest of the batch is still decoded.
pub fn parse_records(payload: &str, window: TimeWindow) -> ParsedPage {
    let mut page = ParsedPage::default();

    for record in payload.split(RECORD_SEPARATOR) {
        if record.trim().is_empty() {
            continue;
        }
        match parse_record(record) {
            Ok((tick, second)) => {
                if window.contains(second) {
                    page.ticks.push(tick);
                }
            }
            Err(reason) => page.notices.push(FieldParseError {
                record: record.to_string(),
                reason,
            }),
        }
    }

    page
}

fn parse_record(record: &str) -> Result<(Tick, u32), String> {
    let fields: Vec<&str> = record
        .split(FIELD_SEPARATOR)
        .take(FIELDS_PER_RECORD)
        .collect();
    if fields.len() < FIELDS_PER_RECORD {
        return Err(format!(
            "missing fields (expected {FIELDS_PER_RECORD}, got {})",
            fields.len()
        ));
    }

    let sequence_index = fields[0]
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid index: {}", fields[0]))?;
    let time_of_day = fields[1].trim().to_string();
    let second = time_to_seconds(&time_of_day)?;

    let tick = Tick {
        sequence_index,
        time_of_day,
        price: parse_f64(fields[2], "price")?,
        change_percent: parse_f64(fields[3], "change")?,
        volume: parse_f64(fields[4], "volume")?,
        amount: parse_f64(fields[5], "amount")?,
        side: Side::from_code(fields[6]),
    };
    Ok((tick, second))
}

fn parse_f64(value: &str, field: &str) -> Result<f64, String> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid {field}: {value}"))?;
    if !parsed.is_finite() {
        return Err(format!("invalid {field}: {value}"));
    }
    Ok(parsed)
}

/// Parses `H`, `H:MM` or `H:MM:SS` into seconds since midnight.
pub fn time_to_seconds(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty time".to_string());
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(format!("invalid time: {value}"));
    }

    let multipliers = [3600u32, 60, 1];
    let mut total = 0u32;
    for (part, multiplier) in parts.iter().zip(multipliers) {
        let component: u32 = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid time: {value}"))?;
        total = component
            .checked_mul(multiplier)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| format!("invalid time: {value}"))?;
    }
    Ok(total)
}
