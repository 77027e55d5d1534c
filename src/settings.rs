//! Simulation settings
//!
//! Loaded from a JSON file where every field is optional. The settings are
//! turned into an explicit [`ProjectionConfig`] before simulating, so nothing
//! in the engine reads process-wide state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ProjectionError, Result};
use crate::projection::{DepletionRules, ProjectionConfig};

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// First simulated day
    #[serde(default = "default_simulation_start")]
    pub simulation_start: NaiveDate,

    /// Last simulated day (inclusive)
    #[serde(default = "default_simulation_end")]
    pub simulation_end: NaiveDate,

    /// Present date; today when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_date: Option<NaiveDate>,

    /// Whether the renderer also plots the total balance
    #[serde(default = "default_true")]
    pub plot_total: bool,

    #[serde(default = "default_true")]
    pub living_depletes_discretionary: bool,

    #[serde(default = "default_true")]
    pub emergency_depletes_discretionary: bool,

    /// Mode of bills that state neither `actual` nor `projected`
    #[serde(default)]
    pub projected_by_default: bool,
}

fn default_simulation_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 7, 22).unwrap_or_default()
}

fn default_simulation_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 7, 22).unwrap_or_default()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation_start: default_simulation_start(),
            simulation_end: default_simulation_end(),
            present_date: None,
            plot_total: true,
            living_depletes_discretionary: true,
            emergency_depletes_discretionary: true,
            projected_by_default: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&contents)?;
        log::debug!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings from a file if it exists, otherwise use the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            log::debug!("No settings file at {}, using defaults", path.as_ref().display());
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulation_end < self.simulation_start {
            return Err(ProjectionError::InvalidSettings(format!(
                "simulation_end {} is before simulation_start {}",
                self.simulation_end, self.simulation_start
            )));
        }
        Ok(())
    }

    pub fn depletion_rules(&self) -> DepletionRules {
        DepletionRules {
            living_depletes_discretionary: self.living_depletes_discretionary,
            emergency_depletes_discretionary: self.emergency_depletes_discretionary,
        }
    }

    /// Present date, falling back to `today`
    pub fn present_date_or(&self, today: NaiveDate) -> NaiveDate {
        self.present_date.unwrap_or(today)
    }

    /// Build the engine configuration, resolving an unset present date to `today`
    pub fn projection_config(&self, today: NaiveDate) -> ProjectionConfig {
        ProjectionConfig {
            start: self.simulation_start,
            end: self.simulation_end,
            present_date: self.present_date_or(today),
            depletion: self.depletion_rules(),
        }
    }
}
