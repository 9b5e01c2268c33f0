//! Booking configuration.

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{BookCalError, BookCalResult};

fn default_timezone() -> Tz {
    chrono_tz::America::Los_Angeles
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_window_start() -> f64 {
    10.0
}

fn default_window_end() -> f64 {
    18.0
}

fn default_step_hours() -> f64 {
    2.0
}

fn default_px_per_hour() -> f64 {
    48.0
}

fn default_min_visual_minutes() -> i64 {
    30
}

/// Configuration at ~/.config/bookcal/config.toml
///
/// The business timezone is fixed configuration. Nothing derives it from
/// the machine's environment, so slot math is identical wherever the CLI
/// runs.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default)]
    pub booking_window: BookingWindow,

    #[serde(default)]
    pub layout: LayoutConfig,
}

/// The canonical work window offered by the booking dialog.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BookingWindow {
    #[serde(default = "default_window_start")]
    pub start_hour: f64,
    #[serde(default = "default_window_end")]
    pub end_hour: f64,
    #[serde(default = "default_step_hours")]
    pub step_hours: f64,
}

/// Week-grid rendering constants.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_px_per_hour")]
    pub px_per_hour: f64,
    #[serde(default = "default_min_visual_minutes")]
    pub min_visual_minutes: i64,
}

impl Default for BookingWindow {
    fn default() -> Self {
        BookingWindow {
            start_hour: default_window_start(),
            end_hour: default_window_end(),
            step_hours: default_step_hours(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            px_per_hour: default_px_per_hour(),
            min_visual_minutes: default_min_visual_minutes(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        BookingConfig {
            timezone: default_timezone(),
            api_base_url: default_api_base_url(),
            booking_window: BookingWindow::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl BookingConfig {
    pub fn config_path() -> BookCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BookCalError::Config("Could not determine config directory".into()))?
            .join("bookcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it is missing.
    pub fn load() -> BookCalResult<BookingConfig> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(BookingConfig::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| BookCalError::Config(e.to_string()))
    }
}
