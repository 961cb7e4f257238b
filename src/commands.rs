// src/commands.rs

//! What each subcommand computes, separated from how `run` prints it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use crate::alerts::{AlertDefaults, AlertEvent, evaluate_workflow};
use crate::config::ConfigFile;
use crate::engine::{AlertSink, SweepCore, SweepRuntime, bootstrap_workflow};
use crate::errors::Result;
use crate::progress::{ProgressReport, aggregate};
use crate::store::{ProjectStore, TaskStore, WorkflowStore};
use crate::tasks::TaskGraph;
use crate::types::{TaskId, TaskStatus};
use crate::workflow::{Project, Workflow};

/// The configured template scheduled over a date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePlan {
    pub workflow: Workflow,
    pub completion: DateTime<Utc>,
}

pub fn plan_template(
    cfg: &ConfigFile,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<TemplatePlan> {
    let mut workflow = Workflow::from_template("template", &cfg.template);
    let completion = workflow.schedule(start, end, &cfg.schedule_options())?;
    Ok(TemplatePlan {
        workflow,
        completion,
    })
}

/// Alerts and progress for one project.
#[derive(Debug, Clone)]
pub struct ProjectCheck {
    pub project: Project,
    pub alerts: Vec<AlertEvent>,
    pub report: ProgressReport,
}

/// Evaluate every project in `store` at `now`, in project id order.
pub fn check_projects<S>(
    store: &S,
    defaults: &AlertDefaults,
    now: DateTime<Utc>,
) -> Result<Vec<ProjectCheck>>
where
    S: ProjectStore + WorkflowStore + ?Sized,
{
    store
        .projects()?
        .into_iter()
        .map(|project| -> Result<ProjectCheck> {
            let wf = store.load_workflow(&project.id)?;
            Ok(ProjectCheck {
                alerts: evaluate_workflow(wf.as_ref(), now, defaults),
                report: aggregate(&project, wf.as_ref()),
                project,
            })
        })
        .collect()
}

/// A task that is not done yet, with the dependencies it still waits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTask {
    pub id: TaskId,
    pub status: TaskStatus,
    pub pending: Vec<TaskId>,
}

impl OpenTask {
    pub fn is_ready(&self) -> bool {
        self.pending.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOverview {
    pub total: usize,
    /// Dependencies before dependents.
    pub order: Vec<TaskId>,
    pub open: Vec<OpenTask>,
}

/// Check the stored task graph for cycles and report what is ready.
pub fn task_overview<S: TaskStore + ?Sized>(store: &S) -> Result<TaskOverview> {
    let tasks = store.load_tasks()?;
    let graph = TaskGraph::from_tasks(&tasks);

    for task in &tasks {
        graph.validate_no_cycle(&task.id, &task.depends_on)?;
    }
    let order = graph.topological_order()?;

    let open = tasks
        .iter()
        .filter(|t| !t.is_done())
        .map(|t| -> Result<OpenTask> {
            Ok(OpenTask {
                id: t.id.clone(),
                status: t.status,
                pending: graph.pending_dependencies(&t.id)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TaskOverview {
        total: tasks.len(),
        order,
        open,
    })
}

/// Give every stored project its workflow, scheduling new ones.
pub fn bootstrap_projects<S>(store: &S, cfg: &ConfigFile) -> Result<Vec<Workflow>>
where
    S: ProjectStore + WorkflowStore + ?Sized,
{
    let schedule = cfg.schedule_options();
    store
        .projects()?
        .iter()
        .map(|project| bootstrap_workflow(store, project, &cfg.template, &schedule))
        .collect()
}

/// Bootstrap missing workflows, then run the alert sweep until `shutdown`
/// (or for one tick with `once`).
pub async fn run_sweep<S, K>(
    cfg: &ConfigFile,
    store: Arc<S>,
    sink: K,
    shutdown: watch::Receiver<bool>,
    once: bool,
) -> Result<()>
where
    S: ProjectStore + WorkflowStore + 'static,
    K: AlertSink,
{
    let workflows = bootstrap_projects(store.as_ref(), cfg)?;
    info!(workflows = workflows.len(), once, "starting alert sweep");

    let core = SweepCore::new(cfg.alert_defaults());
    SweepRuntime::new(core, store, sink, cfg.sweep_options())
        .run(shutdown, once)
        .await
}
