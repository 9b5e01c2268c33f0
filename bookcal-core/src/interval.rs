//! Half-open time intervals and the overlap test shared by slot
//! filtering, layout, and the sync client's range trimming.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)`. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, refusing empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<TimeInterval> {
        if start < end {
            Some(TimeInterval { start, end })
        } else {
            None
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Two half-open intervals overlap iff each starts before the other ends.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn interval(start_hour: u32, end_hour: u32) -> TimeInterval {
        TimeInterval::new(
            Utc.with_ymd_and_hms(2026, 8, 5, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 5, end_hour, 0, 0).unwrap(),
        )
        .unwrap()
    }

    // --- new ---

    #[test]
    fn refuses_empty_and_inverted() {
        let t = Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap();
        assert!(TimeInterval::new(t, t).is_none());
        assert!(TimeInterval::new(t + Duration::hours(1), t).is_none());
    }

    // --- overlaps ---

    #[test]
    fn overlapping_intervals() {
        assert!(interval(9, 11).overlaps(&interval(10, 12)));
        assert!(interval(9, 12).overlaps(&interval(10, 11)));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!interval(9, 10).overlaps(&interval(10, 11)));
        assert!(!interval(10, 11).overlaps(&interval(9, 10)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!interval(9, 10).overlaps(&interval(14, 15)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let pairs = [
            (interval(9, 11), interval(10, 12)),
            (interval(9, 10), interval(10, 11)),
            (interval(9, 12), interval(10, 11)),
            (interval(8, 9), interval(14, 15)),
        ];
        for (a, b) in pairs {
            assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
