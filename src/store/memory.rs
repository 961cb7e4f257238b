// src/store/memory.rs

//! In-memory store backed by mutex-guarded maps.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use tracing::debug;

use crate::errors::{PhaseflowError, Result};
use crate::snapshot::Snapshot;
use crate::store::{ProjectStore, TaskStore, WorkflowStore};
use crate::tasks::Task;
use crate::types::{ProjectId, TaskId};
use crate::workflow::{Project, StepTemplate, Workflow};

#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: Mutex<BTreeMap<ProjectId, Project>>,
    workflows: Mutex<BTreeMap<ProjectId, Workflow>>,
    tasks: Mutex<BTreeMap<TaskId, Task>>,
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| PhaseflowError::Other(anyhow!("memory store mutex poisoned")))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load everything from a snapshot.
    ///
    /// Project ids, workflow project ids and task ids must each be unique.
    /// Workflow status, progress and current step are recomputed from the
    /// steps (manual `OnHold`/`Cancelled` are kept). Tasks keep the versions
    /// they carry (0 is bumped to 1).
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let projects = index_unique(snapshot.projects, "project", |p| p.id.clone())?;
        let workflows = index_unique(snapshot.workflows, "workflow for project", |wf| {
            wf.project_id.clone()
        })?;
        let tasks = index_unique(snapshot.tasks, "task", |t| t.id.clone())?;

        let workflows = workflows
            .into_iter()
            .map(|(id, mut wf)| {
                wf.refresh();
                (id, wf)
            })
            .collect();
        let tasks = tasks
            .into_iter()
            .map(|(id, mut t)| {
                t.version = t.version.max(1);
                (id, t)
            })
            .collect();

        Ok(Self {
            projects: Mutex::new(projects),
            workflows: Mutex::new(workflows),
            tasks: Mutex::new(tasks),
        })
    }

    pub fn insert_project(&self, project: Project) -> Result<()> {
        lock(&self.projects)?.insert(project.id.clone(), project);
        Ok(())
    }
}

fn index_unique<T>(
    items: Vec<T>,
    what: &str,
    key: impl Fn(&T) -> String,
) -> Result<BTreeMap<String, T>> {
    let mut map = BTreeMap::new();
    for item in items {
        let id = key(&item);
        if map.contains_key(&id) {
            return Err(PhaseflowError::ConfigError(format!(
                "duplicate {what} '{id}' in snapshot"
            )));
        }
        map.insert(id, item);
    }
    Ok(map)
}

impl ProjectStore for MemoryStore {
    fn load_project(&self, project_id: &str) -> Result<Option<Project>> {
        Ok(lock(&self.projects)?.get(project_id).cloned())
    }

    fn projects(&self) -> Result<Vec<Project>> {
        Ok(lock(&self.projects)?.values().cloned().collect())
    }
}

impl WorkflowStore for MemoryStore {
    fn load_workflow(&self, project_id: &str) -> Result<Option<Workflow>> {
        Ok(lock(&self.workflows)?.get(project_id).cloned())
    }

    fn active_workflows(&self) -> Result<Vec<Workflow>> {
        Ok(lock(&self.workflows)?
            .values()
            .filter(|wf| wf.status.is_active())
            .cloned()
            .collect())
    }

    fn save_workflow(&self, workflow: Workflow) -> Result<()> {
        lock(&self.workflows)?.insert(workflow.project_id.clone(), workflow);
        Ok(())
    }

    fn ensure_workflow(&self, project: &Project, template: &[StepTemplate]) -> Result<Workflow> {
        let mut workflows = lock(&self.workflows)?;
        let wf = workflows.entry(project.id.clone()).or_insert_with(|| {
            debug!(project = %project.id, "creating workflow from template");
            Workflow::from_template(project.id.clone(), template)
        });
        Ok(wf.clone())
    }
}

impl TaskStore for MemoryStore {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(lock(&self.tasks)?.values().cloned().collect())
    }

    fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        Ok(lock(&self.tasks)?.get(task_id).cloned())
    }

    fn insert_task(&self, mut task: Task) -> Result<Task> {
        let mut tasks = lock(&self.tasks)?;
        if tasks.contains_key(&task.id) {
            return Err(PhaseflowError::TaskExists(task.id));
        }
        task.version = 1;
        tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    fn save_task(&self, mut task: Task, expected_version: u64) -> Result<Task> {
        let mut tasks = lock(&self.tasks)?;
        let found = tasks
            .get(&task.id)
            .map(|t| t.version)
            .ok_or_else(|| PhaseflowError::UnknownTask(task.id.clone()))?;
        if found != expected_version {
            return Err(PhaseflowError::ConcurrentModification {
                task: task.id,
                expected: expected_version,
                found,
            });
        }
        task.version = found + 1;
        tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }
}
