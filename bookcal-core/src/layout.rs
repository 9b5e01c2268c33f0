//! Column packing for concurrent events in the week grid.

use chrono::{DateTime, Utc};

use crate::event::Event;

/// Column assignment for one rendered event. Recomputed per render,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSlot {
    pub event: Event,
    pub column: u32,
    pub column_count: u32,
}

/// Horizontal fraction and vertical pixel placement for one layout slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub left_pct: f64,
    pub width_pct: f64,
    pub top_px: f64,
    pub height_px: f64,
}

/// Assign a column to each of one day's events so overlapping events
/// render side by side.
///
/// Greedy by start time, ties kept in input order: each event takes the
/// smallest column whose already-placed events it does not overlap.
/// `column_count` is the day's maximum concurrency, applied uniformly to
/// every event of the day. Deterministic: the same input yields the same
/// columns on every re-render.
///
/// Appointment calendars rarely exceed 3-4 concurrent events, so greedy
/// O(n^2) placement is enough; optimal interval coloring is not needed.
pub fn layout_day(events: &[Event]) -> Vec<LayoutSlot> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    // Stable sort: ties keep input order.
    order.sort_by_key(|&i| events[i].start);

    let mut columns = vec![0u32; events.len()];
    let mut placed: Vec<usize> = Vec::new();

    for &i in &order {
        let mut column = 0;
        while placed
            .iter()
            .any(|&j| columns[j] == column && overlaps(&events[j], &events[i]))
        {
            column += 1;
        }
        columns[i] = column;
        placed.push(i);
    }

    let column_count = columns.iter().copied().max().map_or(1, |m| m + 1);

    order
        .into_iter()
        .map(|i| LayoutSlot {
            event: events[i].clone(),
            column: columns[i],
            column_count,
        })
        .collect()
}

fn overlaps(a: &Event, b: &Event) -> bool {
    a.start < b.end && a.end > b.start
}

/// Map a layout slot onto the day grid.
///
/// Width splits the day column by `column_count`; vertical position
/// scales minutes after `day_start` by `px_per_hour`. Events shorter
/// than `min_visual_minutes` are drawn at that height so they stay
/// clickable.
pub fn geometry(
    slot: &LayoutSlot,
    day_start: DateTime<Utc>,
    px_per_hour: f64,
    min_visual_minutes: i64,
) -> SlotGeometry {
    let width_pct = 100.0 / f64::from(slot.column_count);
    let left_pct = f64::from(slot.column) * width_pct;

    let top_minutes = (slot.event.start - day_start).num_minutes();
    let shown_minutes = (slot.event.end - slot.event.start)
        .num_minutes()
        .max(min_visual_minutes);

    SlotGeometry {
        left_pct,
        width_pct,
        top_px: top_minutes as f64 / 60.0 * px_per_hour,
        height_px: shown_minutes as f64 / 60.0 * px_per_hour,
    }
}
