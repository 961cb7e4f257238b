// src/workflow/step.rs

//! A single workflow step and its sub-tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Phase, Priority, StepCategory, StepId};

/// Per-step alert configuration.
///
/// Unset fields are resolved at evaluation time (see
/// [`crate::alerts::resolve_alert_days`]), never stored as derived values,
/// so changing `priority` later also changes the effective lead time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTrigger {
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Days before the due date at which to first warn.
    #[serde(default)]
    pub alert_days: Option<u32>,

    /// Day offsets past due at which to re-alert, ascending.
    #[serde(default)]
    pub overdue_intervals: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_by: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl SubTask {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_completed: false,
            completed_at: None,
            completed_by: None,
            notes: String::new(),
        }
    }

    pub(crate) fn mark_completed(&mut self, by: &str, at: DateTime<Utc>) {
        if self.is_completed {
            return;
        }
        self.is_completed = true;
        self.completed_at = Some(at);
        self.completed_by = Some(by.to_string());
    }
}

/// One unit of work inside a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub name: String,
    pub phase: Phase,

    /// Role responsible by default (e.g. `"project_manager"`).
    pub role: String,

    /// Specific person, when one has been assigned.
    #[serde(default)]
    pub assignee: Option<String>,

    pub estimated_days: u32,

    #[serde(default)]
    pub subtasks: Vec<SubTask>,

    /// Informational ordering only; not enforced.
    #[serde(default)]
    pub depends_on: Vec<StepId>,

    /// Explicit category; falls back to the phase default.
    #[serde(default)]
    pub category: Option<StepCategory>,

    /// Trade this step belongs to (e.g. `"roofing"`), if any.
    #[serde(default)]
    pub trade: Option<String>,

    #[serde(default)]
    pub alert: AlertTrigger,

    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_by: Option<String>,

    #[serde(default)]
    pub scheduled_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_end: Option<DateTime<Utc>>,
}

impl Step {
    pub fn new(id: impl Into<StepId>, name: impl Into<String>, phase: Phase) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phase,
            role: String::new(),
            assignee: None,
            estimated_days: 0,
            subtasks: Vec::new(),
            depends_on: Vec::new(),
            category: None,
            trade: None,
            alert: AlertTrigger::default(),
            is_completed: false,
            completed_at: None,
            completed_by: None,
            scheduled_start: None,
            scheduled_end: None,
            actual_start: None,
            actual_end: None,
        }
    }

    /// Effective category: explicit, else derived from the phase.
    pub fn category(&self) -> StepCategory {
        self.category.unwrap_or_else(|| self.phase.default_category())
    }

    /// Mark the step complete, closing any open sub-tasks with it.
    ///
    /// Returns `false` if the step was already complete.
    pub(crate) fn mark_completed(&mut self, by: &str, at: DateTime<Utc>) -> bool {
        if self.is_completed {
            return false;
        }
        for sub in self.subtasks.iter_mut() {
            sub.mark_completed(by, at);
        }
        self.is_completed = true;
        self.completed_at = Some(at);
        self.completed_by = Some(by.to_string());
        self.actual_start.get_or_insert(at);
        self.actual_end = Some(at);
        true
    }

    pub(crate) fn reopen(&mut self) -> bool {
        if !self.is_completed {
            return false;
        }
        self.is_completed = false;
        self.completed_at = None;
        self.completed_by = None;
        self.actual_end = None;
        true
    }

    pub fn all_subtasks_completed(&self) -> bool {
        self.subtasks.iter().all(|s| s.is_completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn completing_a_step_closes_its_subtasks() {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let mut step = Step::new("inspect", "Inspection", Phase::Prospect);
        step.subtasks.push(SubTask::new("inspect-1", "Photos"));
        step.subtasks.push(SubTask::new("inspect-2", "Measurements"));

        assert!(step.mark_completed("sam", at));
        assert!(step.all_subtasks_completed());
        assert_eq!(step.subtasks[0].completed_by.as_deref(), Some("sam"));
        assert_eq!(step.actual_start, Some(at));
        assert_eq!(step.actual_end, Some(at));

        assert!(!step.mark_completed("kim", at));
        assert_eq!(step.completed_by.as_deref(), Some("sam"));
    }

    #[test]
    fn reopen_clears_completion_only() {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let mut step = Step::new("a", "A", Phase::Lead);
        step.mark_completed("sam", at);
        assert!(step.reopen());
        assert!(!step.is_completed);
        assert_eq!(step.actual_start, Some(at));
        assert_eq!(step.actual_end, None);
        assert!(!step.reopen());
    }

    #[test]
    fn explicit_category_wins_over_phase() {
        let mut step = Step::new("order", "Order materials", Phase::Approved);
        assert_eq!(step.category(), StepCategory::Admin);
        step.category = Some(StepCategory::Materials);
        assert_eq!(step.category(), StepCategory::Materials);
    }
}
