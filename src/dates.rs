use chrono::NaiveDate;
use crate::error::{DateParseError, RecordError, Result};

/// month/day/year, the way the clinical exports write dates
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// parse a fixed-format date string - empty/missing counts as malformed
pub fn parse_date(s: Option<&str>, format: &str) -> std::result::Result<NaiveDate, DateParseError> {
    let fail = |value: &str| DateParseError {
        value: value.to_string(),
        format: format.to_string(),
    };

    let raw = s.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err(fail(raw));
    }

    NaiveDate::parse_from_str(raw, format).map_err(|_| fail(raw))
}

/// largest offset accepted, in days: the span chrono can represent between two dates.
/// keeps every duration well inside the range f64 holds exactly
pub fn max_offset_days() -> i64 {
    (NaiveDate::MAX - NaiveDate::MIN).num_days()
}

/// follow-up in whole days: (last_alive - index) - offset, never clamped.
/// None when the offset pushes the result out of i64
pub fn compute_duration(last_alive: NaiveDate, index: NaiveDate, offset: i64) -> Option<i64> {
    (last_alive - index).num_days().checked_sub(offset)
}

/// offset column: empty/absent -> 0, integers or integral decimals ("12.0") accepted,
/// magnitude capped at `max_offset_days`
pub fn parse_offset(s: Option<&str>) -> Result<i64> {
    let raw = match s.map(str::trim) {
        None | Some("") => return Ok(0),
        Some(raw) => raw,
    };

    let limit = max_offset_days();
    if let Ok(days) = raw.parse::<i64>() {
        return match days.checked_abs() {
            Some(abs) if abs <= limit => Ok(days),
            _ => Err(RecordError::invalid_offset(raw)),
        };
    }

    // spreadsheet exports turn integer columns with gaps into floats
    match raw.parse::<f64>() {
        Ok(days) if days.is_finite() && days.fract() == 0.0 && days.abs() <= limit as f64 => {
            Ok(days as i64)
        }
        _ => Err(RecordError::invalid_offset(raw)),
    }
}
