// src/engine/bootstrap.rs

use tracing::{info, warn};

use crate::errors::Result;
use crate::schedule::ScheduleOptions;
use crate::store::WorkflowStore;
use crate::workflow::{Project, StepTemplate, Workflow};

/// Give a project its workflow.
///
/// Creates the workflow from `template` if the project has none, and
/// schedules it when the project carries both dates and no step has been
/// scheduled yet. An existing, already scheduled workflow is returned
/// unchanged.
///
/// A scheduling failure is logged and the unscheduled workflow is kept; the
/// project still gets its checklist.
pub fn bootstrap_workflow<W: WorkflowStore + ?Sized>(
    store: &W,
    project: &Project,
    template: &[StepTemplate],
    options: &ScheduleOptions,
) -> Result<Workflow> {
    let mut wf = store.ensure_workflow(project, template)?;

    let already_scheduled = wf.steps.iter().any(|s| s.scheduled_end.is_some());
    let (Some(start), Some(end)) = (project.start_date, project.end_date) else {
        return Ok(wf);
    };
    if already_scheduled {
        return Ok(wf);
    }

    match wf.schedule(start, end, options) {
        Ok(completion) => {
            info!(project = %project.id, %completion, "scheduled new workflow");
            store.save_workflow(wf.clone())?;
        }
        Err(e) => {
            warn!(project = %project.id, error = %e, "could not schedule workflow");
        }
    }
    Ok(wf)
}
