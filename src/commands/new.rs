use anyhow::Result;
use bookcal_core::config::BookingConfig;
use bookcal_core::event::{Event, EventDraft};
use bookcal_core::interval::TimeInterval;
use bookcal_core::{slots, time};
use bookcal_remote::EventSyncClient;
use chrono::NaiveDate;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;

use crate::render::span_label;
use crate::utils::{parse, tui};

pub async fn run(
    config: &BookingConfig,
    title: Option<String>,
    date: Option<String>,
    client_ref: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let interactive = title.is_none() || date.is_none();
    let zone = config.timezone;

    let date = match date {
        Some(d) => parse::parse_date(&d)?,
        None => prompt_date()?,
    };

    let mut client = EventSyncClient::new(config.api_base_url.clone(), zone);
    let spinner = tui::create_spinner("Checking availability".to_string());
    let events = client.events_for_day(date).await;
    spinner.finish_and_clear();

    let busy: Vec<TimeInterval> = events?.iter().filter_map(Event::busy_interval).collect();
    let window = config.booking_window;
    let candidates = slots::window_slots(
        date,
        window.start_hour,
        window.end_hour,
        window.step_hours,
        zone,
    );
    let open = slots::available_slots(candidates, &busy);

    if open.is_empty() {
        println!(
            "{}",
            format!("No open slots on {}", time::day_label(date)).dimmed()
        );
        return Ok(());
    }

    let items: Vec<String> = open.iter().map(|s| span_label(s, zone)).collect();
    let selection = Select::new()
        .with_prompt("  Time")
        .items(&items)
        .default(0)
        .interact()?;
    let slot = &open[selection];

    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let notes = match notes {
        Some(n) if !n.is_empty() => Some(n),
        Some(_) => None,
        None if interactive => {
            let input: String = Input::new()
                .with_prompt("  Notes (skip)")
                .default(String::new())
                .show_default(false)
                .interact_text()?;
            if input.is_empty() { None } else { Some(input) }
        }
        None => None,
    };

    let draft = EventDraft {
        title,
        start: slot.start(),
        end: slot.end(),
        client_id: client_ref,
        notes,
    };
    let created = client.create(&draft).await?;

    if interactive {
        println!();
    }
    println!(
        "{}",
        format!(
            "  Booked: {} ({}, {})",
            created.title,
            time::day_label(date),
            span_label(slot, zone)
        )
        .green()
    );

    Ok(())
}

/// Prompt for a day with retry on parse errors.
fn prompt_date() -> Result<NaiveDate> {
    loop {
        let input: String = Input::new()
            .with_prompt("  Day (YYYY-MM-DD)")
            .interact_text()?;
        match parse::parse_date(&input) {
            Ok(date) => return Ok(date),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}
