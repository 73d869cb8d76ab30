//! Due-date normalization: anything that is not a real calendar date becomes `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a due date from whatever the AI or the server handed us.
///
/// Timestamps keep the date as written; no timezone conversion happens.
pub fn normalize_due_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim().trim_matches('"').trim();
    if s.is_empty() || s.eq_ignore_ascii_case("null") {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Same as [`normalize_due_date`] but for optional input, rendered back to ISO.
pub fn normalize_due_date_str(raw: Option<&str>) -> Option<String> {
    raw.and_then(normalize_due_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
}
