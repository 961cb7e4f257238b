// src/tasks/task.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProjectId, TaskId, TaskStatus};

/// A work item with hard, by-id dependencies on other tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
    /// Bumped on every committed write; used for optimistic concurrency.
    #[serde(default)]
    pub version: u64,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        project_id: impl Into<ProjectId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            title: title.into(),
            assignee: None,
            due_date: None,
            status: TaskStatus::ToDo,
            depends_on: Vec::new(),
            version: 0,
        }
    }

    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        self.depends_on.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Whether moving into `status` requires every dependency to be done.
pub fn requires_dependencies(status: TaskStatus) -> bool {
    matches!(status, TaskStatus::InProgress | TaskStatus::Done)
}
