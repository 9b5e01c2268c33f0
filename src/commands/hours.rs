use anyhow::Result;
use bookcal_core::time;
use bookcal_core::working_hours::{DayCode, RulePatch, SlotMode, WorkingHours, WorkingHoursRule};
use clap::{Subcommand, ValueEnum};
use owo_colors::OwoColorize;

use crate::render::fmt_hours;

#[derive(Subcommand)]
pub enum HoursCommand {
    /// Show the configured rules
    Show,
    /// Add a rule covering the first unassigned day
    Add,
    /// Claim or release a day on a rule
    Toggle {
        /// Rule number, as listed by `hours show`
        rule: usize,

        /// Day to toggle (mon..sun)
        day: String,
    },
    /// Change a rule's window or slot subdivision
    Set {
        /// Rule number, as listed by `hours show`
        rule: usize,

        /// Window start in fractional hours (9.5 is 9:30 am)
        #[arg(long)]
        start: Option<f64>,

        /// Window end in fractional hours
        #[arg(long)]
        end: Option<f64>,

        /// Slot length in hours
        #[arg(long)]
        duration: Option<f64>,

        /// Number of slots
        #[arg(long)]
        quantity: Option<u32>,

        /// Which field drives the subdivision; the other is re-derived
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Offer bookable slots on this rule's days
        #[arg(long)]
        slots: Option<bool>,
    },
    /// Move a window edge in quarter-hour steps
    Nudge {
        /// Rule number, as listed by `hours show`
        rule: usize,

        #[arg(value_enum)]
        edge: Edge,

        /// Signed number of quarter-hour steps
        #[arg(allow_hyphen_values = true)]
        steps: i32,
    },
    /// Remove a rule, leaving its days unassigned
    Remove {
        /// Rule number, as listed by `hours show`
        rule: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Duration,
    Quantity,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Edge {
    Start,
    End,
}

pub fn run(command: HoursCommand) -> Result<()> {
    let mut hours = WorkingHours::load()?;

    match command {
        HoursCommand::Show => {
            print_rules(&hours);
            return Ok(());
        }
        HoursCommand::Add => {
            let added_day = hours.add_rule().and_then(|r| r.days.first().copied());
            match added_day {
                Some(day) => println!("Added a rule on {}", day.label()),
                None => {
                    println!("{}", "Every day already belongs to a rule".yellow());
                    return Ok(());
                }
            }
        }
        HoursCommand::Toggle { rule, day } => {
            let id = resolve_rule(&hours, rule)?;
            let Some(day) = DayCode::parse(&day) else {
                anyhow::bail!("Unknown day: \"{day}\" (use mon..sun)");
            };
            if !hours.toggle_day(&id, day) {
                println!(
                    "{}",
                    format!(
                        "Can't toggle {}: it belongs to another rule, or it is this rule's last day",
                        day.label()
                    )
                    .yellow()
                );
                return Ok(());
            }
        }
        HoursCommand::Set {
            rule,
            start,
            end,
            duration,
            quantity,
            mode,
            slots,
        } => {
            let id = resolve_rule(&hours, rule)?;
            let patch = RulePatch {
                start_hour: start,
                end_hour: end,
                slots_enabled: slots,
                mode: mode.map(|m| match m {
                    ModeArg::Duration => SlotMode::Duration,
                    ModeArg::Quantity => SlotMode::Quantity,
                }),
                slot_duration_hours: duration,
                slot_quantity: quantity,
            };
            if !hours.update_rule(&id, patch) {
                println!(
                    "{}",
                    "Not applied: the window must stay inside the day, with start before end"
                        .yellow()
                );
                return Ok(());
            }
        }
        HoursCommand::Nudge { rule, edge, steps } => {
            let id = resolve_rule(&hours, rule)?;
            let applied = match edge {
                Edge::Start => hours.nudge_start(&id, steps),
                Edge::End => hours.nudge_end(&id, steps),
            };
            if !applied {
                println!(
                    "{}",
                    "Not applied: that would push the edge past the other one".yellow()
                );
                return Ok(());
            }
        }
        HoursCommand::Remove { rule } => {
            let id = resolve_rule(&hours, rule)?;
            hours.remove_rule(&id);
        }
    }

    hours.save()?;
    print_rules(&hours);
    Ok(())
}

/// Map a 1-based rule number from `hours show` to its id.
fn resolve_rule(hours: &WorkingHours, number: usize) -> Result<String> {
    number
        .checked_sub(1)
        .and_then(|i| hours.rules().get(i))
        .map(|r| r.id.clone())
        .ok_or_else(|| anyhow::anyhow!("No rule {number} (run `bookcal hours show`)"))
}

fn print_rules(hours: &WorkingHours) {
    if hours.rules().is_empty() {
        println!("{}", "No working-hours rules".dimmed());
        return;
    }

    for (i, rule) in hours.rules().iter().enumerate() {
        println!("{}. {}", i + 1, render_rule(rule));
    }

    let unassigned: Vec<&str> = DayCode::ALL
        .iter()
        .filter(|d| hours.rule_for_day(**d).is_none())
        .map(|d| d.label())
        .collect();
    if !unassigned.is_empty() {
        println!("{}", format!("Unassigned: {}", unassigned.join(" ")).dimmed());
    }
}

fn render_rule(rule: &WorkingHoursRule) -> String {
    let days: Vec<&str> = rule.days.iter().map(|d| d.label()).collect();
    let window = format!(
        "{} - {}",
        time::hour_label(rule.start_hour),
        time::hour_label(rule.end_hour)
    );
    let mut line = format!("{}  {}", days.join(" "), window);

    if rule.slots_enabled {
        line = format!(
            "{}  {} x {} slots",
            line,
            rule.slot_quantity,
            fmt_hours(rule.slot_duration_hours)
        );
        if rule.remainder_hours() > 0.0 {
            line = format!(
                "{} {}",
                line,
                format!("({} unslotted)", fmt_hours(rule.remainder_hours())).dimmed()
            );
        }
    } else {
        line = format!("{}  {}", line, "no slot booking".dimmed());
    }

    line
}
