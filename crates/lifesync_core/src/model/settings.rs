//! Application settings model.
//!
//! # Invariants
//! - Notification times are 24-hour `HH:MM` strings.
//! - `is_garmin_enhanced` only affects provenance labels of synced goals.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static CLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid clock time regex"));

/// Stored appearance preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    Light,
    Dark,
    #[default]
    System,
}

/// Effective theme after resolving `DarkMode::System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

/// Daily reminder preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub morning_enabled: bool,
    pub morning_time: String,
    pub evening_enabled: bool,
    pub evening_time: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            morning_enabled: true,
            morning_time: "08:00".to_string(),
            evening_enabled: true,
            evening_time: "21:00".to_string(),
        }
    }
}

/// User-editable application settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub dark_mode: DarkMode,
    /// Gate for health sync; sync is a no-op while false.
    #[serde(default)]
    pub is_health_connected: bool,
    /// Labels synced values with the enhanced source.
    #[serde(default)]
    pub is_garmin_enhanced: bool,
}

/// Settings validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsValidationError {
    InvalidClockTime { field: &'static str, value: String },
}

impl Display for SettingsValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidClockTime { field, value } => {
                write!(f, "{field} must be HH:MM (24h), got `{value}`")
            }
        }
    }
}

impl Error for SettingsValidationError {}

impl AppSettings {
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        check_clock_time("morningTime", &self.notifications.morning_time)?;
        check_clock_time("eveningTime", &self.notifications.evening_time)?;
        Ok(())
    }

    /// Resolves the stored preference against the host's appearance.
    pub fn effective_theme(&self, system_prefers_dark: bool) -> Theme {
        match self.dark_mode {
            DarkMode::Light => Theme::Light,
            DarkMode::Dark => Theme::Dark,
            DarkMode::System if system_prefers_dark => Theme::Dark,
            DarkMode::System => Theme::Light,
        }
    }
}

fn check_clock_time(field: &'static str, value: &str) -> Result<(), SettingsValidationError> {
    if CLOCK_TIME_RE.is_match(value) {
        Ok(())
    } else {
        Err(SettingsValidationError::InvalidClockTime {
            field,
            value: value.to_string(),
        })
    }
}
