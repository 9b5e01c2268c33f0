//! Timezone-aware date/time helpers.
//!
//! Every computation takes an explicit `Tz` so nothing in the scheduling
//! core depends on the ambient system timezone. The business timezone is
//! configuration (see `config::BookingConfig`), never the machine's.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Smallest step for working-hour values (15 minutes).
pub const QUARTER_HOUR: f64 = 0.25;

/// Resolve a local wall-clock time in `zone` to a UTC instant.
///
/// Takes the earlier side of a DST ambiguity and steps forward out of a
/// DST gap in quarter-hour increments.
fn resolve_local(naive: NaiveDateTime, zone: Tz) -> DateTime<Utc> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(first, _) => first.with_timezone(&Utc),
        LocalResult::None => {
            let mut probe = naive;
            loop {
                probe += Duration::minutes(15);
                if let Some(dt) = zone.from_local_datetime(&probe).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
        }
    }
}

/// Start of `date` (00:00 local) in `zone`.
pub fn day_start(date: NaiveDate, zone: Tz) -> DateTime<Utc> {
    resolve_local(date.and_hms_opt(0, 0, 0).unwrap(), zone)
}

/// End of `date`, exclusive: 00:00 local of the following day.
pub fn day_end(date: NaiveDate, zone: Tz) -> DateTime<Utc> {
    day_start(date + Duration::days(1), zone)
}

/// The instant `hours` after midnight on `date`, as wall-clock time.
///
/// `hours` is a fractional hour count quantized to quarter hours;
/// 24.0 resolves to midnight of the following day.
pub fn at_hour(date: NaiveDate, hours: f64, zone: Tz) -> DateTime<Utc> {
    let total_minutes = (hours * 60.0).round() as i64;
    let (date, minutes) = if total_minutes >= 24 * 60 {
        (date + Duration::days(1), total_minutes - 24 * 60)
    } else {
        (date, total_minutes)
    };
    let naive = date.and_hms_opt(0, 0, 0).unwrap() + Duration::minutes(minutes);
    resolve_local(naive, zone)
}

/// Round a fractional hour to the nearest quarter hour.
pub fn round_to_quarter(hours: f64) -> f64 {
    (hours * 4.0).round() / 4.0
}

/// Move an hour value by `steps` quarter-hour increments, clamped to [0, 24].
pub fn nudge(hours: f64, steps: i32) -> f64 {
    let nudged = round_to_quarter(hours) + f64::from(steps) * QUARTER_HOUR;
    nudged.clamp(0.0, 24.0)
}

/// The local date of the Sunday starting the week containing `instant`.
pub fn week_anchor_date(instant: DateTime<Utc>, zone: Tz) -> NaiveDate {
    let local_date = instant.with_timezone(&zone).date_naive();
    local_date - Duration::days(i64::from(local_date.weekday().num_days_from_sunday()))
}

/// Sunday 00:00 (in `zone`) of the week containing `instant`.
pub fn week_start(instant: DateTime<Utc>, zone: Tz) -> DateTime<Utc> {
    day_start(week_anchor_date(instant, zone), zone)
}

/// Signed number of whole weeks from `from`'s week to `to`'s week.
pub fn week_offset(from: DateTime<Utc>, to: DateTime<Utc>, zone: Tz) -> i64 {
    // Anchors are both Sundays, so the difference is an exact multiple of 7.
    (week_anchor_date(to, zone) - week_anchor_date(from, zone)).num_days() / 7
}

/// Format a fractional hour as a clock label ("9:00 am", "1:30 pm").
pub fn hour_label(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    let (h, m) = (total_minutes / 60, total_minutes % 60);
    let (h12, meridiem) = match h {
        0 | 24 => (12, "am"),
        12 => (12, "pm"),
        h if h > 12 => (h - 12, "pm"),
        h => (h, "am"),
    };
    format!("{}:{:02} {}", h12, m, meridiem)
}

/// Format an instant's local time in `zone` ("9:00 am").
pub fn time_label(instant: DateTime<Utc>, zone: Tz) -> String {
    instant.with_timezone(&zone).format("%-I:%M %P").to_string()
}

/// Format a date as a short day label (e.g. "Wed Feb 25").
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use chrono_tz::America::Los_Angeles;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    // --- round_to_quarter / nudge ---

    #[test]
    fn rounds_to_nearest_quarter() {
        assert_eq!(round_to_quarter(2.0), 2.0);
        assert_eq!(round_to_quarter(8.0 / 3.0), 2.75);
        assert_eq!(round_to_quarter(2.6), 2.5);
        assert_eq!(round_to_quarter(9.1), 9.0);
    }

    #[test]
    fn nudge_moves_in_quarter_steps() {
        assert_eq!(nudge(9.0, 1), 9.25);
        assert_eq!(nudge(9.0, -2), 8.5);
    }

    #[test]
    fn nudge_clamps_to_day_bounds() {
        assert_eq!(nudge(0.0, -1), 0.0);
        assert_eq!(nudge(23.75, 2), 24.0);
    }

    // --- day bounds ---

    #[test]
    fn day_start_resolves_business_zone() {
        // PST is UTC-8 before the March 2026 DST switch.
        assert_eq!(day_start(date(2026, 3, 2), Los_Angeles), utc(2026, 3, 2, 8, 0));
    }

    #[test]
    fn at_hour_is_wall_clock_time() {
        assert_eq!(
            at_hour(date(2026, 3, 2), 10.0, Los_Angeles),
            utc(2026, 3, 2, 18, 0)
        );
        assert_eq!(
            at_hour(date(2026, 3, 2), 13.5, Los_Angeles),
            utc(2026, 3, 2, 21, 30)
        );
    }

    #[test]
    fn at_hour_24_is_next_midnight() {
        assert_eq!(
            at_hour(date(2026, 3, 2), 24.0, Los_Angeles),
            day_start(date(2026, 3, 3), Los_Angeles)
        );
    }

    #[test]
    fn spring_forward_day_is_23_hours() {
        // DST starts 2026-03-08 in Los Angeles.
        let d = date(2026, 3, 8);
        let length = day_end(d, Los_Angeles) - day_start(d, Los_Angeles);
        assert_eq!(length, Duration::hours(23));
    }

    // --- week anchor ---

    #[test]
    fn week_anchor_is_sunday() {
        // 2026-08-04 is a Tuesday; its week starts Sunday 2026-08-02.
        let anchor = week_anchor_date(utc(2026, 8, 4, 12, 0), chrono_tz::UTC);
        assert_eq!(anchor, date(2026, 8, 2));
        assert_eq!(anchor.weekday(), Weekday::Sun);
    }

    #[test]
    fn week_anchor_of_sunday_is_itself() {
        let anchor = week_anchor_date(utc(2026, 8, 2, 0, 0), chrono_tz::UTC);
        assert_eq!(anchor, date(2026, 8, 2));
    }

    #[test]
    fn week_offset_is_signed() {
        let now = utc(2026, 8, 4, 12, 0);
        assert_eq!(week_offset(now, utc(2026, 8, 6, 0, 0), chrono_tz::UTC), 0);
        assert_eq!(week_offset(now, utc(2026, 8, 9, 0, 0), chrono_tz::UTC), 1);
        assert_eq!(week_offset(now, utc(2026, 7, 28, 0, 0), chrono_tz::UTC), -1);
        assert_eq!(week_offset(now, utc(2026, 7, 20, 0, 0), chrono_tz::UTC), -2);
    }

    // --- labels ---

    #[test]
    fn hour_labels() {
        assert_eq!(hour_label(9.0), "9:00 am");
        assert_eq!(hour_label(13.5), "1:30 pm");
        assert_eq!(hour_label(0.0), "12:00 am");
        assert_eq!(hour_label(12.0), "12:00 pm");
        assert_eq!(hour_label(2.75), "2:45 am");
    }

    #[test]
    fn day_labels() {
        assert_eq!(day_label(date(2026, 8, 5)), "Wed Aug 5");
    }
}
