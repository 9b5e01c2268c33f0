//! Slot generation and availability filtering.
//!
//! Slots are derived, never persisted: every caller regenerates them from
//! the working window or rule, so there is no state to fall out of sync.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::interval::TimeInterval;
use crate::time;
use crate::working_hours::WorkingHoursRule;

/// Lazy iterator over fixed-step slots within a work window.
///
/// Restartable and stateless beyond its cursor: regenerating for the same
/// day yields the same slots.
#[derive(Debug, Clone)]
pub struct SlotIter {
    cursor: DateTime<Utc>,
    window_end: DateTime<Utc>,
    step: Duration,
}

impl Iterator for SlotIter {
    type Item = TimeInterval;

    fn next(&mut self) -> Option<TimeInterval> {
        let end = self.cursor + self.step;
        if end > self.window_end {
            return None;
        }
        let slot = TimeInterval::new(self.cursor, end)?;
        self.cursor = end;
        Some(slot)
    }
}

/// Consecutive `[cursor, cursor + step)` slots inside `[start_hour,
/// end_hour)` on `date`. A slot whose end would pass the window end is
/// dropped, never truncated.
pub fn window_slots(
    date: NaiveDate,
    start_hour: f64,
    end_hour: f64,
    step_hours: f64,
    zone: Tz,
) -> SlotIter {
    let cursor = time::at_hour(date, start_hour, zone);
    let window_end = time::at_hour(date, end_hour.max(start_hour), zone);
    let step_minutes = ((step_hours * 60.0).round() as i64).max(1);
    SlotIter {
        cursor,
        window_end,
        step: Duration::minutes(step_minutes),
    }
}

/// Slots for a rule's subdivision on `date`.
///
/// Empty when the rule has slots disabled. Trailing remainder time is not
/// offered (see `WorkingHoursRule::remainder_hours`).
pub fn rule_slots(rule: &WorkingHoursRule, date: NaiveDate, zone: Tz) -> Vec<TimeInterval> {
    if !rule.slots_enabled {
        return Vec::new();
    }
    let mut slots = Vec::new();
    for i in 0..rule.slot_quantity {
        let slot_start = rule.start_hour + f64::from(i) * rule.slot_duration_hours;
        let slot_end = slot_start + rule.slot_duration_hours;
        if slot_end > rule.end_hour + 1e-9 {
            break;
        }
        let start = time::at_hour(date, slot_start, zone);
        let end = time::at_hour(date, slot_end, zone);
        if let Some(slot) = TimeInterval::new(start, end) {
            slots.push(slot);
        }
    }
    slots
}

/// Whether a candidate slot is free of every busy interval.
pub fn is_available(slot: &TimeInterval, busy: &[TimeInterval]) -> bool {
    busy.iter().all(|b| !slot.overlaps(b))
}

/// Filter candidate slots down to those overlapping no busy interval.
///
/// O(slots x events) per day; both counts stay in the tens.
pub fn available_slots(
    slots: impl IntoIterator<Item = TimeInterval>,
    busy: &[TimeInterval],
) -> Vec<TimeInterval> {
    slots.into_iter().filter(|s| is_available(s, busy)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::working_hours::{RulePatch, SlotMode, WorkingHours};
    use chrono::TimeZone;
    use chrono_tz::UTC;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    fn busy(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> TimeInterval {
        TimeInterval::new(
            Utc.with_ymd_and_hms(2026, 8, 5, start_h, start_m, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 5, end_h, end_m, 0).unwrap(),
        )
        .unwrap()
    }

    fn hours_of(slot: &TimeInterval) -> (u32, u32) {
        use chrono::Timelike;
        (slot.start().hour(), slot.end().hour())
    }

    // --- window_slots ---

    #[test]
    fn canonical_window_yields_four_slots() {
        let slots: Vec<_> = window_slots(day(), 10.0, 18.0, 2.0, UTC).collect();
        let bounds: Vec<_> = slots.iter().map(hours_of).collect();
        assert_eq!(bounds, vec![(10, 12), (12, 14), (14, 16), (16, 18)]);
    }

    #[test]
    fn partial_trailing_slot_is_dropped() {
        let slots: Vec<_> = window_slots(day(), 10.0, 17.0, 2.0, UTC).collect();
        assert_eq!(slots.len(), 3);
        assert_eq!(hours_of(&slots[2]), (14, 16));
    }

    #[test]
    fn empty_window_yields_no_slots() {
        assert_eq!(window_slots(day(), 10.0, 10.0, 2.0, UTC).count(), 0);
        assert_eq!(window_slots(day(), 18.0, 10.0, 2.0, UTC).count(), 0);
    }

    #[test]
    fn regeneration_is_idempotent() {
        let first: Vec<_> = window_slots(day(), 10.0, 18.0, 2.0, UTC).collect();
        let second: Vec<_> = window_slots(day(), 10.0, 18.0, 2.0, UTC).collect();
        assert_eq!(first, second);
    }

    // --- availability ---

    #[test]
    fn busy_event_excludes_overlapping_slot() {
        let all: Vec<_> = window_slots(day(), 10.0, 18.0, 2.0, UTC).collect();
        let open = available_slots(all, &[busy(13, 0, 13, 30)]);
        let bounds: Vec<_> = open.iter().map(hours_of).collect();
        assert_eq!(bounds, vec![(10, 12), (14, 16), (16, 18)]);
    }

    #[test]
    fn touching_event_does_not_exclude_slot() {
        let all: Vec<_> = window_slots(day(), 10.0, 18.0, 2.0, UTC).collect();
        // Ends exactly at the slot boundary.
        let open = available_slots(all, &[busy(8, 0, 10, 0)]);
        assert_eq!(open.len(), 4);
    }

    #[test]
    fn fully_booked_day_is_empty_not_an_error() {
        let all: Vec<_> = window_slots(day(), 10.0, 18.0, 2.0, UTC).collect();
        let open = available_slots(all, &[busy(9, 0, 19, 0)]);
        assert!(open.is_empty());
    }

    // --- rule_slots ---

    #[test]
    fn rule_slots_follow_the_subdivision() {
        let hours = WorkingHours::weekday_default();
        let rule = &hours.rules()[0];
        let slots = rule_slots(rule, day(), UTC);
        let bounds: Vec<_> = slots.iter().map(hours_of).collect();
        assert_eq!(bounds, vec![(9, 11), (11, 13), (13, 15), (15, 17)]);
    }

    #[test]
    fn rule_slots_drop_past_window_end() {
        let mut hours = WorkingHours::weekday_default();
        let id = hours.rules()[0].id.clone();
        // 8h window in 3 slots: best-fit duration 2.75h, so the third slot
        // would end at 17.25 and is dropped.
        assert!(hours.update_rule(
            &id,
            RulePatch {
                mode: Some(SlotMode::Quantity),
                slot_quantity: Some(3),
                ..RulePatch::default()
            }
        ));
        let slots = rule_slots(&hours.rules()[0], day(), UTC);
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn disabled_rule_offers_no_slots() {
        let mut hours = WorkingHours::weekday_default();
        let id = hours.rules()[0].id.clone();
        assert!(hours.update_rule(
            &id,
            RulePatch {
                slots_enabled: Some(false),
                ..RulePatch::default()
            }
        ));
        assert!(rule_slots(&hours.rules()[0], day(), UTC).is_empty());
    }
}
