// src/alerts/event.rs

use serde::Serialize;

use crate::types::{AlertKind, ProjectId, StepId};

/// One alert produced by the evaluator.
///
/// `offset_days` is `days_until_due` for warning/urgent events and
/// `days_overdue` for overdue events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AlertEvent {
    pub project_id: ProjectId,
    pub step_id: StepId,
    pub step_name: String,
    pub kind: AlertKind,
    pub offset_days: i64,
}

impl AlertEvent {
    /// Key a delivery layer should use to avoid re-sending the same alert on
    /// every tick.
    pub fn dedup_key(&self) -> (StepId, AlertKind, i64) {
        (self.step_id.clone(), self.kind, self.offset_days)
    }
}
