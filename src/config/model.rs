// src/config/model.rs

use serde::Deserialize;

use crate::alerts::AlertDefaults;
use crate::engine::SweepOptions;
use crate::schedule::ScheduleOptions;
use crate::workflow::{StepTemplate, default_template};

/// Configuration as read from `Phaseflow.toml`, before validation.
///
/// ```toml
/// [alerts]
/// overdue_intervals = [1, 3, 7]
///
/// [alerts.alert_days]
/// high = 0
/// medium = 1
/// low = 3
///
/// [schedule]
/// min_step_days = 1
///
/// [sweep]
/// interval_secs = 300
/// max_concurrent = 8
///
/// [[step]]
/// id = "lead_intake"
/// name = "Lead intake"
/// phase = "lead"
/// role = "office"
/// estimated_days = 1
/// ```
///
/// All sections are optional. Without any `[[step]]` the built-in template
/// is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub alerts: AlertsSection,

    #[serde(default)]
    pub schedule: ScheduleSection,

    #[serde(default)]
    pub sweep: SweepSection,

    /// Custom step template, in order.
    #[serde(default)]
    pub step: Vec<StepTemplate>,
}

/// `[alerts]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertsSection {
    /// Day offsets past due that re-alert, strictly ascending.
    #[serde(default = "default_overdue_intervals")]
    pub overdue_intervals: Vec<u32>,

    #[serde(default)]
    pub alert_days: AlertDaysSection,
}

fn default_overdue_intervals() -> Vec<u32> {
    vec![1, 3, 7]
}

impl Default for AlertsSection {
    fn default() -> Self {
        Self {
            overdue_intervals: default_overdue_intervals(),
            alert_days: AlertDaysSection::default(),
        }
    }
}

/// `[alerts.alert_days]`: warning lead time per priority.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AlertDaysSection {
    #[serde(default)]
    pub high: u32,
    #[serde(default = "default_medium_days")]
    pub medium: u32,
    #[serde(default = "default_low_days")]
    pub low: u32,
}

fn default_medium_days() -> u32 {
    1
}

fn default_low_days() -> u32 {
    3
}

impl Default for AlertDaysSection {
    fn default() -> Self {
        Self {
            high: 0,
            medium: default_medium_days(),
            low: default_low_days(),
        }
    }
}

/// `[schedule]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScheduleSection {
    #[serde(default = "default_min_step_days")]
    pub min_step_days: u32,
}

fn default_min_step_days() -> u32 {
    1
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            min_step_days: default_min_step_days(),
        }
    }
}

/// `[sweep]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SweepSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Workflows evaluated in parallel per tick.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_interval_secs() -> u64 {
    300
}

fn default_max_concurrent() -> usize {
    8
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or [`Default`]), so a
/// `ConfigFile` in hand always satisfies the checks in `validate.rs`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub alerts: AlertsSection,
    pub schedule: ScheduleSection,
    pub sweep: SweepSection,
    /// Effective template: the custom `[[step]]` list or the built-in one.
    pub template: Vec<StepTemplate>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        let template = if raw.step.is_empty() {
            default_template()
        } else {
            raw.step
        };
        Self {
            alerts: raw.alerts,
            schedule: raw.schedule,
            sweep: raw.sweep,
            template,
        }
    }

    pub fn alert_defaults(&self) -> AlertDefaults {
        AlertDefaults {
            high_alert_days: self.alerts.alert_days.high,
            medium_alert_days: self.alerts.alert_days.medium,
            low_alert_days: self.alerts.alert_days.low,
            overdue_intervals: self.alerts.overdue_intervals.clone(),
        }
    }

    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            min_step_days: self.schedule.min_step_days,
        }
    }

    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            interval: std::time::Duration::from_secs(self.sweep.interval_secs),
            max_concurrent: self.sweep.max_concurrent,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}
