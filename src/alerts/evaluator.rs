// src/alerts/evaluator.rs

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::alerts::event::AlertEvent;
use crate::time::ceil_days_between;
use crate::types::{AlertKind, Priority};
use crate::workflow::{AlertTrigger, Step, Workflow};

/// Fallback thresholds used when a step does not set its own.
///
/// Built from `[alerts]` in `Phaseflow.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDefaults {
    pub high_alert_days: u32,
    pub medium_alert_days: u32,
    pub low_alert_days: u32,
    pub overdue_intervals: Vec<u32>,
}

impl Default for AlertDefaults {
    fn default() -> Self {
        Self {
            high_alert_days: 0,
            medium_alert_days: 1,
            low_alert_days: 3,
            overdue_intervals: vec![1, 3, 7],
        }
    }
}

/// Lead time before the due date at which to warn.
///
/// Explicit `alert_days` wins; otherwise it follows the priority, which
/// itself defaults to `Medium`.
pub fn resolve_alert_days(trigger: &AlertTrigger, defaults: &AlertDefaults) -> u32 {
    if let Some(days) = trigger.alert_days {
        return days;
    }
    match trigger.priority.unwrap_or_default() {
        Priority::High => defaults.high_alert_days,
        Priority::Medium => defaults.medium_alert_days,
        Priority::Low => defaults.low_alert_days,
    }
}

/// Day offsets past due that produce an overdue alert.
pub fn resolve_overdue_intervals<'a>(
    trigger: &'a AlertTrigger,
    defaults: &'a AlertDefaults,
) -> &'a [u32] {
    trigger
        .overdue_intervals
        .as_deref()
        .unwrap_or(&defaults.overdue_intervals)
}

/// Classify every open, scheduled step against `now`.
///
/// Rules, evaluated independently per step:
/// - warning: `0 < days_until_due <= alert_days`
/// - urgent: `days_until_due == 0`
/// - overdue: `days_overdue > 0` and `days_overdue` is one of the overdue
///   intervals. Exact match only: a tick missed on day 3 is not caught up on
///   day 4.
///
/// The result depends only on the inputs.
pub fn evaluate(
    project_id: &str,
    steps: &[Step],
    now: DateTime<Utc>,
    defaults: &AlertDefaults,
) -> Vec<AlertEvent> {
    let mut events = Vec::new();

    for step in steps {
        if step.is_completed {
            continue;
        }
        let Some(due) = step.scheduled_end else {
            trace!(step = %step.id, "no scheduled end; skipping");
            continue;
        };

        let days_until_due = ceil_days_between(now, due);
        let days_overdue = ceil_days_between(due, now);
        let alert_days = resolve_alert_days(&step.alert, defaults);
        let intervals = resolve_overdue_intervals(&step.alert, defaults);

        let mut emit = |kind: AlertKind, offset_days: i64| {
            debug!(
                project = %project_id,
                step = %step.id,
                %kind,
                offset_days,
                "alert"
            );
            events.push(AlertEvent {
                project_id: project_id.to_string(),
                step_id: step.id.clone(),
                step_name: step.name.clone(),
                kind,
                offset_days,
            });
        };

        if days_until_due > 0 && days_until_due <= i64::from(alert_days) {
            emit(AlertKind::Warning, days_until_due);
        }
        if days_until_due == 0 {
            emit(AlertKind::Urgent, days_until_due);
        }
        if days_overdue > 0 && intervals.iter().any(|&i| i64::from(i) == days_overdue) {
            emit(AlertKind::Overdue, days_overdue);
        }
    }

    events
}

/// Evaluate a project's workflow; a missing workflow yields no alerts.
pub fn evaluate_workflow(
    workflow: Option<&Workflow>,
    now: DateTime<Utc>,
    defaults: &AlertDefaults,
) -> Vec<AlertEvent> {
    match workflow {
        Some(wf) => evaluate(&wf.project_id, &wf.steps, now, defaults),
        None => {
            debug!("no workflow for project; nothing to evaluate");
            Vec::new()
        }
    }
}
