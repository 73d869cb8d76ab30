//! Time utilities: "today" in the user's timezone.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Resolve an IANA timezone name like "America/Chicago".
pub fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Calendar date of `now` as seen in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz = parse_tz(tz)?;
    Ok(now.with_timezone(&tz).date_naive())
}

pub fn today_in(tz: &str) -> Result<NaiveDate> {
    local_date(Utc::now(), tz)
}
