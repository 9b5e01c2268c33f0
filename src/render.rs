//! Terminal rendering for the week grid and slot lists.
//!
//! Colored output via owo_colors; the grid's column packing shows up as
//! lane markers on concurrent appointments.

use bookcal_core::interval::TimeInterval;
use bookcal_core::layout::LayoutSlot;
use bookcal_core::time;
use chrono_tz::Tz;
use owo_colors::OwoColorize;

use crate::view::{DayView, WeekView};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for WeekView {
    fn render(&self) -> String {
        let mut lines = Vec::new();
        lines.push(
            format!("Week of {}", time::day_label(self.anchor))
                .bold()
                .to_string(),
        );
        lines.push(
            format!(
                "{} {}, {} booked",
                self.metrics.event_count,
                if self.metrics.event_count == 1 {
                    "appointment"
                } else {
                    "appointments"
                },
                fmt_hours(self.metrics.booked_hours),
            )
            .dimmed()
            .to_string(),
        );

        for day in &self.days {
            lines.push(String::new());
            lines.push(day.render());
        }

        lines.join("\n")
    }
}

impl Render for DayView {
    fn render(&self) -> String {
        let mut lines = vec![time::day_label(self.date).bold().to_string()];

        if self.slots.is_empty() {
            lines.push(format!("   {}", "no appointments".dimmed()));
        }
        for slot in &self.slots {
            lines.push(format!("   {}", render_event_line(slot, self.zone)));
        }

        let open = match self.open_slots {
            0 => "fully booked".to_string(),
            1 => "1 open slot".to_string(),
            n => format!("{n} open slots"),
        };
        lines.push(format!("   {}", open.dimmed()));

        lines.join("\n")
    }
}

/// One appointment line. Concurrent appointments carry a lane marker so
/// the side-by-side placement stays visible in a flat listing.
fn render_event_line(slot: &LayoutSlot, zone: Tz) -> String {
    let span = format!(
        "{} - {}",
        time::time_label(slot.event.start, zone),
        time::time_label(slot.event.end, zone)
    );
    let mut line = format!("{span}  {}", slot.event.title);
    if slot.column_count > 1 {
        let lane = format!("[lane {}/{}]", slot.column + 1, slot.column_count);
        line = format!("{line} {}", lane.dimmed());
    }
    if let Some(client) = &slot.event.client_id {
        line = format!("{line} {}", format!("({client})").dimmed());
    }
    line
}

/// A slot's time span ("10:00 am - 12:00 pm").
pub fn span_label(interval: &TimeInterval, zone: Tz) -> String {
    format!(
        "{} - {}",
        time::time_label(interval.start(), zone),
        time::time_label(interval.end(), zone)
    )
}

/// Fractional hours as a compact duration ("2h", "2h 45m", "45m").
pub fn fmt_hours(hours: f64) -> String {
    let total = (hours * 60.0).round() as i64;
    match (total / 60, total % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_hours_covers_all_shapes() {
        assert_eq!(fmt_hours(2.0), "2h");
        assert_eq!(fmt_hours(2.75), "2h 45m");
        assert_eq!(fmt_hours(0.5), "30m");
        assert_eq!(fmt_hours(0.0), "0m");
    }
}
