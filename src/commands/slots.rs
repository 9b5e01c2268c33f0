use anyhow::Result;
use bookcal_core::config::BookingConfig;
use bookcal_core::event::Event;
use bookcal_core::interval::TimeInterval;
use bookcal_core::working_hours::{DayCode, WorkingHours};
use bookcal_core::{slots, time};
use bookcal_remote::EventSyncClient;
use chrono::Datelike;
use owo_colors::OwoColorize;

use crate::render::{fmt_hours, span_label};
use crate::utils::{parse, tui};

pub async fn run(config: &BookingConfig, date: &str) -> Result<()> {
    let date = parse::parse_date(date)?;
    let zone = config.timezone;

    let mut client = EventSyncClient::new(config.api_base_url.clone(), zone);
    let spinner = tui::create_spinner("Checking availability".to_string());
    let events = client.events_for_day(date).await;
    spinner.finish_and_clear();

    let events = events?;
    let busy: Vec<TimeInterval> = events.iter().filter_map(Event::busy_interval).collect();

    println!("{}", time::day_label(date).bold());

    // A configured rule drives the day's slots; unassigned days fall back
    // to the canonical booking window.
    let hours = WorkingHours::load()?;
    let day = DayCode::from_weekday(date.weekday());
    let (candidates, remainder): (Vec<TimeInterval>, f64) = match hours.rule_for_day(day) {
        Some(rule) if !rule.slots_enabled => {
            println!(
                "   {}",
                format!("Slot booking is off on {}", day.label()).dimmed()
            );
            return Ok(());
        }
        Some(rule) => (slots::rule_slots(rule, date, zone), rule.remainder_hours()),
        None => {
            let window = config.booking_window;
            (
                slots::window_slots(
                    date,
                    window.start_hour,
                    window.end_hour,
                    window.step_hours,
                    zone,
                )
                .collect(),
                0.0,
            )
        }
    };

    let open = slots::available_slots(candidates, &busy);
    if open.is_empty() {
        println!("   {}", "No open slots".dimmed());
    }
    for slot in &open {
        println!("   {}", span_label(slot, zone));
    }
    if remainder > 0.0 {
        println!(
            "   {}",
            format!("({} at the end of the window is unslotted)", fmt_hours(remainder)).dimmed()
        );
    }

    Ok(())
}
