//! Working-hours rules: a partition of weekdays into working windows,
//! each with an optional slot subdivision.
//!
//! Every mutation either applies cleanly or is refused; the rule set
//! never enters an invalid state and there is no error path, only
//! applied/not-applied return values.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BookCalError, BookCalResult};
use crate::time;

const DEFAULT_START_HOUR: f64 = 9.0;
const DEFAULT_END_HOUR: f64 = 17.0;
const DEFAULT_SLOT_DURATION: f64 = 2.0;

/// Bounds for a slot subdivision duration, in hours.
const MIN_SLOT_DURATION: f64 = 0.25;
const MAX_SLOT_DURATION: f64 = 8.0;

const WORKING_HOURS_FILE: &str = "working_hours.toml";

/// Day-of-week codes, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCode {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayCode {
    pub const ALL: [DayCode; 7] = [
        DayCode::Mon,
        DayCode::Tue,
        DayCode::Wed,
        DayCode::Thu,
        DayCode::Fri,
        DayCode::Sat,
        DayCode::Sun,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DayCode::Mon => "Mon",
            DayCode::Tue => "Tue",
            DayCode::Wed => "Wed",
            DayCode::Thu => "Thu",
            DayCode::Fri => "Fri",
            DayCode::Sat => "Sat",
            DayCode::Sun => "Sun",
        }
    }

    pub fn parse(input: &str) -> Option<DayCode> {
        match input.to_lowercase().as_str() {
            "mon" | "monday" => Some(DayCode::Mon),
            "tue" | "tuesday" => Some(DayCode::Tue),
            "wed" | "wednesday" => Some(DayCode::Wed),
            "thu" | "thursday" => Some(DayCode::Thu),
            "fri" | "friday" => Some(DayCode::Fri),
            "sat" | "saturday" => Some(DayCode::Sat),
            "sun" | "sunday" => Some(DayCode::Sun),
            _ => None,
        }
    }

    pub fn from_weekday(weekday: Weekday) -> DayCode {
        match weekday {
            Weekday::Mon => DayCode::Mon,
            Weekday::Tue => DayCode::Tue,
            Weekday::Wed => DayCode::Wed,
            Weekday::Thu => DayCode::Thu,
            Weekday::Fri => DayCode::Fri,
            Weekday::Sat => DayCode::Sat,
            Weekday::Sun => DayCode::Sun,
        }
    }
}

/// Which of the two slot-subdivision fields the user edits directly.
/// The other is always re-derived, never tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotMode {
    Duration,
    Quantity,
}

/// One working-hours rule: a set of days, a working window, and an
/// optional slot subdivision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursRule {
    pub id: String,
    pub days: BTreeSet<DayCode>,
    pub start_hour: f64,
    pub end_hour: f64,
    pub slots_enabled: bool,
    pub mode: SlotMode,
    pub slot_duration_hours: f64,
    pub slot_quantity: u32,
}

impl WorkingHoursRule {
    fn on_day(day: DayCode) -> WorkingHoursRule {
        let mut rule = WorkingHoursRule {
            id: Uuid::new_v4().to_string(),
            days: BTreeSet::from([day]),
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            slots_enabled: true,
            mode: SlotMode::Duration,
            slot_duration_hours: DEFAULT_SLOT_DURATION,
            slot_quantity: 1,
        };
        rule.reconcile();
        rule
    }

    /// Length of the working window in hours.
    pub fn span_hours(&self) -> f64 {
        self.end_hour - self.start_hour
    }

    /// Window time not covered by any slot, shown as unused capacity.
    pub fn remainder_hours(&self) -> f64 {
        if !self.slots_enabled {
            return 0.0;
        }
        (self.span_hours() - f64::from(self.slot_quantity) * self.slot_duration_hours).max(0.0)
    }

    /// Re-derive the dependent slot field from the one the user edits.
    fn reconcile(&mut self) {
        match self.mode {
            SlotMode::Duration => {
                // Quarter-hour values are exact in f64; the epsilon guards
                // derived divisions.
                let fit = (self.span_hours() / self.slot_duration_hours + 1e-9).floor();
                self.slot_quantity = (fit as u32).max(1);
            }
            SlotMode::Quantity => {
                let best_fit = self.span_hours() / f64::from(self.slot_quantity);
                self.slot_duration_hours =
                    time::round_to_quarter(best_fit).clamp(MIN_SLOT_DURATION, MAX_SLOT_DURATION);
            }
        }
    }
}

/// Partial field changes for `update_rule`. `None` leaves a field untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RulePatch {
    pub start_hour: Option<f64>,
    pub end_hour: Option<f64>,
    pub slots_enabled: Option<bool>,
    pub mode: Option<SlotMode>,
    pub slot_duration_hours: Option<f64>,
    pub slot_quantity: Option<u32>,
}

/// The full rule set. Days are partitioned: each day belongs to at most
/// one rule, and days of a removed rule become unclaimed rather than
/// being reassigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkingHours {
    rules: Vec<WorkingHoursRule>,
}

impl WorkingHours {
    /// The setup default: one rule spanning Mon-Fri, 09:00-17:00, 2h slots.
    pub fn weekday_default() -> WorkingHours {
        let mut rule = WorkingHoursRule::on_day(DayCode::Mon);
        rule.days
            .extend([DayCode::Tue, DayCode::Wed, DayCode::Thu, DayCode::Fri]);
        WorkingHours { rules: vec![rule] }
    }

    pub fn rules(&self) -> &[WorkingHoursRule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&WorkingHoursRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// The rule claiming `day`, if any.
    pub fn rule_for_day(&self, day: DayCode) -> Option<&WorkingHoursRule> {
        self.rules.iter().find(|r| r.days.contains(&day))
    }

    fn first_unclaimed_day(&self) -> Option<DayCode> {
        DayCode::ALL
            .iter()
            .copied()
            .find(|d| self.rule_for_day(*d).is_none())
    }

    /// Whether a new rule can still be added (some day is unclaimed).
    pub fn can_add_rule(&self) -> bool {
        self.first_unclaimed_day().is_some()
    }

    /// Add a rule on the first unclaimed day.
    ///
    /// `None` when every day is already claimed by some rule.
    pub fn add_rule(&mut self) -> Option<&WorkingHoursRule> {
        let day = self.first_unclaimed_day()?;
        self.rules.push(WorkingHoursRule::on_day(day));
        self.rules.last()
    }

    /// Claim or release `day` on the rule. Refused when the day belongs
    /// to a different rule, or is this rule's last day. Returns whether
    /// the change was applied.
    pub fn toggle_day(&mut self, id: &str, day: DayCode) -> bool {
        let claimed_by_other = self.rules.iter().any(|r| r.id != id && r.days.contains(&day));
        if claimed_by_other {
            return false;
        }
        let Some(rule) = self.rules.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if rule.days.contains(&day) {
            if rule.days.len() == 1 {
                return false;
            }
            rule.days.remove(&day);
        } else {
            rule.days.insert(day);
        }
        true
    }

    /// Apply `patch`, then re-derive the dependent slot field.
    ///
    /// Hour values are quantized to quarter hours; a patch that would
    /// leave `start >= end` or step outside [0, 24] is refused whole.
    /// Returns whether the change was applied.
    pub fn update_rule(&mut self, id: &str, patch: RulePatch) -> bool {
        let Some(rule) = self.rules.iter_mut().find(|r| r.id == id) else {
            return false;
        };

        let start = patch
            .start_hour
            .map(time::round_to_quarter)
            .unwrap_or(rule.start_hour);
        let end = patch
            .end_hour
            .map(time::round_to_quarter)
            .unwrap_or(rule.end_hour);
        if !(0.0..=24.0).contains(&start) || !(0.0..=24.0).contains(&end) || start >= end {
            return false;
        }

        let needs_reconcile = patch.start_hour.is_some()
            || patch.end_hour.is_some()
            || patch.mode.is_some()
            || patch.slot_duration_hours.is_some()
            || patch.slot_quantity.is_some();

        rule.start_hour = start;
        rule.end_hour = end;
        if let Some(enabled) = patch.slots_enabled {
            rule.slots_enabled = enabled;
        }
        if let Some(mode) = patch.mode {
            rule.mode = mode;
        }
        if let Some(duration) = patch.slot_duration_hours {
            rule.slot_duration_hours =
                time::round_to_quarter(duration).clamp(MIN_SLOT_DURATION, MAX_SLOT_DURATION);
        }
        if let Some(quantity) = patch.slot_quantity {
            rule.slot_quantity = quantity.max(1);
        }

        if needs_reconcile {
            rule.reconcile();
        }
        true
    }

    /// Nudge the window start by `steps` quarter hours, clamped to the day
    /// and to `start < end`.
    pub fn nudge_start(&mut self, id: &str, steps: i32) -> bool {
        let Some(current) = self.rule(id).map(|r| r.start_hour) else {
            return false;
        };
        self.update_rule(
            id,
            RulePatch {
                start_hour: Some(time::nudge(current, steps)),
                ..RulePatch::default()
            },
        )
    }

    /// Nudge the window end by `steps` quarter hours.
    pub fn nudge_end(&mut self, id: &str, steps: i32) -> bool {
        let Some(current) = self.rule(id).map(|r| r.end_hour) else {
            return false;
        };
        self.update_rule(
            id,
            RulePatch {
                end_hour: Some(time::nudge(current, steps)),
                ..RulePatch::default()
            },
        )
    }

    /// Remove the rule; its days become unclaimed.
    pub fn remove_rule(&mut self, id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        self.rules.len() != before
    }
}

impl WorkingHours {
    pub fn path() -> BookCalResult<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| BookCalError::Config("Could not determine config directory".into()))?
            .join("bookcal");
        Ok(dir.join(WORKING_HOURS_FILE))
    }

    /// Load the rule set, falling back to the weekday default when no
    /// file has been written yet.
    pub fn load() -> BookCalResult<WorkingHours> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(WorkingHours::weekday_default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| BookCalError::Serialization(e.to_string()))
    }

    pub fn save(&self) -> BookCalResult<()> {
        let path = Self::path()?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| BookCalError::Serialization(e.to_string()))?;

        let temp = path.with_extension("toml.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}
