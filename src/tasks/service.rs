// src/tasks/service.rs

//! Write path for tasks: validate against a fresh snapshot, then commit.
//!
//! Every mutation follows the same sequence:
//! 1. load the full task snapshot from the store,
//! 2. build a [`TaskGraph`] and check the precondition (acyclic
//!    dependencies, or satisfied dependencies for a status change),
//! 3. save with the version read in step 1.
//!
//! If another writer committed in between, the store rejects step 3 with
//! [`PhaseflowError::ConcurrentModification`] and nothing is written.

use tracing::{info, warn};

use crate::errors::{PhaseflowError, Result};
use crate::store::TaskStore;
use crate::tasks::graph::TaskGraph;
use crate::tasks::task::{Task, requires_dependencies};
use crate::types::{TaskId, TaskStatus};

#[derive(Debug)]
pub struct TaskService<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn snapshot(&self) -> Result<(Vec<Task>, TaskGraph)> {
        let tasks = self.store.load_tasks()?;
        let graph = TaskGraph::from_tasks(&tasks);
        Ok((tasks, graph))
    }

    /// Insert a new task after checking its dependencies.
    pub fn create_task(&self, task: Task) -> Result<Task> {
        let (_, graph) = self.snapshot()?;

        if graph.contains(&task.id) {
            return Err(PhaseflowError::TaskExists(task.id));
        }
        if let Err(e) = graph.validate_no_cycle(&task.id, &task.depends_on) {
            warn!(task = %task.id, error = %e, "rejected new task");
            return Err(e);
        }
        if requires_dependencies(task.status) {
            let pending = graph.pending_among(&task.depends_on);
            if !pending.is_empty() {
                return Err(PhaseflowError::DependencyNotSatisfied {
                    task: task.id,
                    pending,
                });
            }
        }

        let created = self.store.insert_task(task)?;
        info!(task = %created.id, deps = ?created.depends_on, "task created");
        Ok(created)
    }

    /// Replace a task's dependency list.
    pub fn set_dependencies(&self, task_id: &str, deps: Vec<TaskId>) -> Result<Task> {
        let (tasks, graph) = self.snapshot()?;
        let current = find(&tasks, task_id)?;

        if let Err(e) = graph.validate_no_cycle(task_id, &deps) {
            warn!(task = %task_id, error = %e, "rejected dependency update");
            return Err(e);
        }

        let mut updated = current.clone();
        updated.depends_on = deps;
        let saved = self.store.save_task(updated, current.version)?;
        info!(task = %saved.id, deps = ?saved.depends_on, "dependencies updated");
        Ok(saved)
    }

    /// Move a task to `status`. `InProgress` and `Done` require every
    /// dependency to be `Done`; on failure the task is left unchanged.
    pub fn transition(&self, task_id: &str, status: TaskStatus) -> Result<Task> {
        let (tasks, graph) = self.snapshot()?;
        let current = find(&tasks, task_id)?;

        if requires_dependencies(status) {
            let pending = graph.pending_dependencies(task_id)?;
            if !pending.is_empty() {
                warn!(task = %task_id, %status, ?pending, "dependencies not satisfied");
                return Err(PhaseflowError::DependencyNotSatisfied {
                    task: task_id.to_string(),
                    pending,
                });
            }
        }

        if current.status == status {
            return Ok(current.clone());
        }

        let mut updated = current.clone();
        updated.status = status;
        let saved = self.store.save_task(updated, current.version)?;
        info!(task = %saved.id, from = %current.status, to = %status, "task status changed");
        Ok(saved)
    }
}

fn find<'a>(tasks: &'a [Task], id: &str) -> Result<&'a Task> {
    tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| PhaseflowError::UnknownTask(id.to_string()))
}
