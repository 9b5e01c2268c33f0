//! Date/time argument parsing. Wall-clock inputs are resolved in the
//! business timezone from config, never the machine's.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse a YYYY-MM-DD day.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{input}\" (expected YYYY-MM-DD)"))
}

/// Parse a wall-clock datetime in `zone` to a UTC instant.
///
/// Takes the earlier side of a DST ambiguity; a time inside a DST gap
/// is rejected rather than silently shifted.
pub fn parse_local_datetime(input: &str, zone: Tz) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M"))
        .map_err(|_| {
            anyhow::anyhow!("Could not parse time: \"{input}\" (expected YYYY-MM-DDTHH:MM)")
        })?;

    zone.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("\"{input}\" does not exist in {zone} (DST gap)"))
}
