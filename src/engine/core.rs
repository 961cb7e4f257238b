// src/engine/core.rs

//! Pure sweep state.
//!
//! The core evaluates workflow snapshots and remembers which alerts the sink
//! has accepted, so a step that stays "1 day overdue" for several ticks
//! produces one overdue alert, not one per tick. Filtering and committing are
//! separate steps: an alert is only remembered once [`SweepCore::mark_delivered`]
//! is called for it, after the sink succeeded. It has no
//! channels, no Tokio types and performs no I/O; the async shell
//! (`engine::runtime::SweepRuntime`) does that.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::alerts::{AlertDefaults, AlertEvent, evaluate};
use crate::types::{AlertKind, ProjectId, StepId};
use crate::workflow::Workflow;

type DeliveryKey = (ProjectId, StepId, AlertKind, i64);

/// Result of one sweep over a set of workflows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStep {
    /// Alerts not delivered before, in workflow then step order.
    pub new_events: Vec<AlertEvent>,
    pub workflows_evaluated: usize,
    /// Alerts produced by the evaluator but already delivered earlier.
    pub suppressed: usize,
}

#[derive(Debug, Clone)]
pub struct SweepCore {
    defaults: AlertDefaults,
    delivered: HashSet<DeliveryKey>,
}

impl SweepCore {
    pub fn new(defaults: AlertDefaults) -> Self {
        Self {
            defaults,
            delivered: HashSet::new(),
        }
    }

    pub fn defaults(&self) -> &AlertDefaults {
        &self.defaults
    }

    /// Number of remembered deliveries (for tests and diagnostics).
    pub fn delivered_len(&self) -> usize {
        self.delivered.len()
    }

    /// Evaluate every workflow snapshot, keep only unseen alerts and mark
    /// them delivered straight away.
    pub fn step(&mut self, workflows: &[Workflow], now: DateTime<Utc>) -> SweepStep {
        let evaluated: Vec<Vec<AlertEvent>> = workflows
            .iter()
            .map(|wf| evaluate(&wf.project_id, &wf.steps, now, &self.defaults))
            .collect();
        let step = self.accept(workflows.iter().map(|wf| wf.project_id.as_str()), evaluated);
        self.mark_delivered(&step.new_events);
        step
    }

    /// Merge per-workflow evaluation results (possibly computed elsewhere)
    /// into a sweep step, dropping alerts already delivered.
    ///
    /// `active_projects` is the set of projects in this sweep; remembered
    /// deliveries for any other project are forgotten. Nothing new is
    /// remembered here; see [`SweepCore::mark_delivered`].
    pub fn accept<'a>(
        &mut self,
        active_projects: impl IntoIterator<Item = &'a str>,
        per_workflow: Vec<Vec<AlertEvent>>,
    ) -> SweepStep {
        let active: HashSet<&str> = active_projects.into_iter().collect();
        self.delivered.retain(|(project, ..)| active.contains(project.as_str()));

        let mut step = SweepStep {
            workflows_evaluated: per_workflow.len(),
            ..SweepStep::default()
        };

        let mut batch: HashSet<DeliveryKey> = HashSet::new();
        for events in per_workflow {
            for event in events {
                let key = delivery_key(&event);
                if !self.delivered.contains(&key) && batch.insert(key) {
                    step.new_events.push(event);
                } else {
                    step.suppressed += 1;
                }
            }
        }

        debug!(
            workflows = step.workflows_evaluated,
            new = step.new_events.len(),
            suppressed = step.suppressed,
            "sweep step"
        );
        step
    }

    /// Remember `events` as handed to the sink. Later sweeps suppress them.
    pub fn mark_delivered(&mut self, events: &[AlertEvent]) {
        self.delivered.extend(events.iter().map(delivery_key));
    }
}

fn delivery_key(event: &AlertEvent) -> DeliveryKey {
    let (step_id, kind, offset) = event.dedup_key();
    (event.project_id.clone(), step_id, kind, offset)
}
