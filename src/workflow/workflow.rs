// src/workflow/workflow.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{PhaseflowError, Result};
use crate::schedule::{ScheduleOptions, schedule_steps};
use crate::types::{ProjectId, WorkflowStatus};
use crate::workflow::step::Step;
use crate::workflow::template::StepTemplate;

/// The checklist attached to a single project.
///
/// `steps` is an ordered sequence: insertion order is significant and
/// defines scheduling, phase and dependency display order. A workflow
/// exclusively owns its steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub project_id: ProjectId,

    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(default)]
    pub status: WorkflowStatus,

    /// Index of the first non-completed step (`steps.len()` when all done).
    #[serde(default)]
    pub current_step_index: usize,

    /// Overall completion percentage, 0..=100.
    #[serde(default)]
    pub progress: u8,

    #[serde(default)]
    pub estimated_completion: Option<DateTime<Utc>>,

    /// Role → assignee identifiers.
    #[serde(default)]
    pub team: BTreeMap<String, Vec<String>>,
}

impl Workflow {
    /// Instantiate a fresh workflow for `project_id` from a template.
    pub fn from_template(project_id: impl Into<ProjectId>, template: &[StepTemplate]) -> Self {
        let project_id = project_id.into();
        let steps = template.iter().map(StepTemplate::instantiate).collect::<Vec<_>>();
        debug!(project = %project_id, steps = steps.len(), "instantiated workflow from template");
        Self {
            project_id,
            steps,
            status: WorkflowStatus::NotStarted,
            current_step_index: 0,
            progress: 0,
            estimated_completion: None,
            team: BTreeMap::new(),
        }
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    fn step_mut(&mut self, step_id: &str) -> Result<&mut Step> {
        self.steps
            .iter_mut()
            .find(|s| s.id == step_id)
            .ok_or_else(|| PhaseflowError::UnknownStep(step_id.to_string()))
    }

    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_completed).count()
    }

    /// Assign scheduled dates across the project window and remember the
    /// resulting completion estimate.
    pub fn schedule(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        options: &ScheduleOptions,
    ) -> Result<DateTime<Utc>> {
        let completion = schedule_steps(&mut self.steps, start, end, options)?;
        self.estimated_completion = Some(completion);
        Ok(completion)
    }

    /// Record that work on a step has begun.
    pub fn start_step(&mut self, step_id: &str, at: DateTime<Utc>) -> Result<()> {
        let step = self.step_mut(step_id)?;
        step.actual_start.get_or_insert(at);
        Ok(())
    }

    /// Complete a step (and its open sub-tasks). Completing twice is a no-op.
    pub fn complete_step(&mut self, step_id: &str, by: &str, at: DateTime<Utc>) -> Result<()> {
        let changed = self.step_mut(step_id)?.mark_completed(by, at);
        if changed {
            info!(project = %self.project_id, step = %step_id, by = %by, "step completed");
            self.refresh();
        }
        Ok(())
    }

    /// Undo a step completion. Sub-task state is left as is.
    pub fn reopen_step(&mut self, step_id: &str) -> Result<()> {
        if self.step_mut(step_id)?.reopen() {
            info!(project = %self.project_id, step = %step_id, "step reopened");
            self.refresh();
        }
        Ok(())
    }

    /// Complete one sub-task; the step completes with its last sub-task.
    pub fn complete_subtask(
        &mut self,
        step_id: &str,
        subtask_id: &str,
        by: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let step = self.step_mut(step_id)?;
        let sub = step
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| PhaseflowError::UnknownStep(format!("{step_id}/{subtask_id}")))?;
        sub.mark_completed(by, at);
        step.actual_start.get_or_insert(at);

        if step.all_subtasks_completed() && step.mark_completed(by, at) {
            info!(
                project = %self.project_id,
                step = %step_id,
                "last sub-task done; step completed"
            );
            self.refresh();
        }
        Ok(())
    }

    pub fn assign_step(&mut self, step_id: &str, assignee: impl Into<String>) -> Result<()> {
        self.step_mut(step_id)?.assignee = Some(assignee.into());
        Ok(())
    }

    pub fn assign_team(&mut self, role: impl Into<String>, assignees: Vec<String>) {
        self.team.insert(role.into(), assignees);
    }

    /// Manual status change (e.g. `OnHold`). Completion bookkeeping keeps
    /// `OnHold`/`Cancelled` until the status is set again.
    pub fn set_status(&mut self, status: WorkflowStatus) {
        self.status = status;
        if !status.is_manual_override() {
            self.refresh();
        }
    }

    /// Recompute progress, current step and derived status.
    pub fn refresh(&mut self) {
        let total = self.steps.len();
        let completed = self.completed_steps();

        self.progress = crate::progress::percentage(completed, total);
        self.current_step_index = self
            .steps
            .iter()
            .position(|s| !s.is_completed)
            .unwrap_or(total);

        if self.status.is_manual_override() {
            return;
        }
        self.status = if total > 0 && completed == total {
            WorkflowStatus::Completed
        } else if completed > 0 {
            WorkflowStatus::InProgress
        } else {
            WorkflowStatus::NotStarted
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use chrono::TimeZone;

    fn tiny() -> Workflow {
        let tpl = vec![
            StepTemplate::new("a", "A", Phase::Lead, "office", 1).subtasks(&["one", "two"]),
            StepTemplate::new("b", "B", Phase::Prospect, "sales", 1).after(&["a"]),
            StepTemplate::new("c", "C", Phase::Execution, "crew", 2).after(&["b"]),
        ];
        Workflow::from_template("p1", &tpl)
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
    }

    #[test]
    fn completion_updates_bookkeeping() {
        let mut wf = tiny();
        assert_eq!(wf.status, WorkflowStatus::NotStarted);

        wf.complete_step("a", "sam", at()).unwrap();
        assert_eq!(wf.status, WorkflowStatus::InProgress);
        assert_eq!(wf.current_step_index, 1);
        assert_eq!(wf.progress, 33);

        wf.complete_step("b", "sam", at()).unwrap();
        wf.complete_step("c", "sam", at()).unwrap();
        assert_eq!(wf.status, WorkflowStatus::Completed);
        assert_eq!(wf.current_step_index, 3);
        assert_eq!(wf.progress, 100);

        wf.reopen_step("b").unwrap();
        assert_eq!(wf.status, WorkflowStatus::InProgress);
        assert_eq!(wf.current_step_index, 1);
        assert_eq!(wf.progress, 67);
    }

    #[test]
    fn last_subtask_completes_the_step() {
        let mut wf = tiny();
        wf.complete_subtask("a", "a-1", "kim", at()).unwrap();
        assert!(!wf.step("a").unwrap().is_completed);
        assert_eq!(wf.step("a").unwrap().actual_start, Some(at()));

        wf.complete_subtask("a", "a-2", "kim", at()).unwrap();
        let a = wf.step("a").unwrap();
        assert!(a.is_completed);
        assert_eq!(a.completed_by.as_deref(), Some("kim"));
        assert_eq!(wf.progress, 33);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut wf = tiny();
        assert!(matches!(
            wf.complete_step("zzz", "sam", at()),
            Err(PhaseflowError::UnknownStep(id)) if id == "zzz"
        ));
        assert!(matches!(
            wf.complete_subtask("a", "a-9", "sam", at()),
            Err(PhaseflowError::UnknownStep(_))
        ));
    }

    #[test]
    fn on_hold_survives_completion() {
        let mut wf = tiny();
        wf.set_status(WorkflowStatus::OnHold);
        wf.complete_step("a", "sam", at()).unwrap();
        assert_eq!(wf.status, WorkflowStatus::OnHold);
        assert_eq!(wf.progress, 33);

        wf.set_status(WorkflowStatus::InProgress);
        assert_eq!(wf.status, WorkflowStatus::InProgress);
    }

    #[test]
    fn team_and_assignee() {
        let mut wf = tiny();
        wf.assign_team("crew", vec!["ana".into(), "ben".into()]);
        wf.assign_step("c", "ana").unwrap();
        assert_eq!(wf.team["crew"], vec!["ana".to_string(), "ben".to_string()]);
        assert_eq!(wf.step("c").unwrap().assignee.as_deref(), Some("ana"));
    }
}
