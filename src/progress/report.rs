// src/progress/report.rs

use serde::Serialize;

use crate::types::Phase;

/// Completion summary for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    /// `false` when the project has no workflow yet; every number is then 0.
    pub has_workflow: bool,
    pub overall: u8,
    pub materials: u8,
    pub labor: u8,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub phases: Vec<PhaseProgress>,
    pub trades: Vec<TradeProgress>,
}

impl ProgressReport {
    /// Neutral result for a project without a workflow.
    pub fn empty() -> Self {
        Self {
            has_workflow: false,
            overall: 0,
            materials: 0,
            labor: 0,
            completed_steps: 0,
            total_steps: 0,
            phases: Vec::new(),
            trades: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseProgress {
    pub phase: Phase,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeProgress {
    pub name: String,
    pub labor_progress: u8,
    pub materials_delivered: bool,
}
