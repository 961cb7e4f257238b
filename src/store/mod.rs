// src/store/mod.rs

//! Persistence seams.
//!
//! The engine never performs I/O itself; it reads and writes through these
//! traits. [`MemoryStore`] implements all of them for tests and for the CLI,
//! which loads a [`crate::snapshot::Snapshot`] into memory.

use std::fmt::Debug;

use crate::errors::Result;
use crate::tasks::Task;
use crate::workflow::{Project, StepTemplate, Workflow};

pub mod memory;

pub use memory::MemoryStore;

/// Project lookup.
pub trait ProjectStore: Send + Sync + Debug {
    fn load_project(&self, project_id: &str) -> Result<Option<Project>>;
    fn projects(&self) -> Result<Vec<Project>>;
}

/// Workflow persistence. One workflow per project.
pub trait WorkflowStore: Send + Sync + Debug {
    fn load_workflow(&self, project_id: &str) -> Result<Option<Workflow>>;

    /// Every workflow the alert sweep should look at. Each returned value is
    /// a consistent snapshot of that workflow.
    fn active_workflows(&self) -> Result<Vec<Workflow>>;

    fn save_workflow(&self, workflow: Workflow) -> Result<()>;

    /// Return the project's workflow, creating it from `template` if absent.
    fn ensure_workflow(&self, project: &Project, template: &[StepTemplate]) -> Result<Workflow>;
}

/// Task persistence with optimistic concurrency.
pub trait TaskStore: Send + Sync + Debug {
    /// Full snapshot of every task, dependency lists included.
    fn load_tasks(&self) -> Result<Vec<Task>>;

    fn get_task(&self, task_id: &str) -> Result<Option<Task>>;

    /// Insert a new task with version 1.
    fn insert_task(&self, task: Task) -> Result<Task>;

    /// Replace a task if its stored version still equals
    /// `expected_version`; the saved copy has its version bumped.
    fn save_task(&self, task: Task, expected_version: u64) -> Result<Task>;
}
