// src/types.rs

//! Closed vocabularies shared across the workflow engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a project (and therefore of its single workflow).
pub type ProjectId = String;

/// Identifier of a workflow step, unique within a template.
pub type StepId = String;

/// Identifier of a [`crate::tasks::Task`].
pub type TaskId = String;

/// The six fixed stages a project workflow passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lead,
    Prospect,
    Approved,
    Execution,
    SecondSupplement,
    Completion,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Lead,
        Phase::Prospect,
        Phase::Approved,
        Phase::Execution,
        Phase::SecondSupplement,
        Phase::Completion,
    ];

    /// Human-facing name, e.g. `"2nd Supplement"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Phase::Lead => "Lead",
            Phase::Prospect => "Prospect",
            Phase::Approved => "Approved",
            Phase::Execution => "Execution",
            Phase::SecondSupplement => "2nd Supplement",
            Phase::Completion => "Completion",
        }
    }

    /// Category a step in this phase falls into when it does not carry one.
    pub fn default_category(self) -> StepCategory {
        match self {
            Phase::Execution => StepCategory::Labor,
            _ => StepCategory::Admin,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_name())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "lead" => Ok(Phase::Lead),
            "prospect" => Ok(Phase::Prospect),
            "approved" => Ok(Phase::Approved),
            "execution" => Ok(Phase::Execution),
            "second_supplement" | "2nd_supplement" => Ok(Phase::SecondSupplement),
            "completion" => Ok(Phase::Completion),
            other => Err(format!("invalid phase: {other}")),
        }
    }
}

/// Alert priority of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "invalid priority: {other} (expected \"low\", \"medium\" or \"high\")"
            )),
        }
    }
}

/// Type dimension used by progress aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepCategory {
    Materials,
    Labor,
    Admin,
}

/// Overall state of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl WorkflowStatus {
    /// Statuses that are set by hand and survive completion bookkeeping.
    pub fn is_manual_override(self) -> bool {
        matches!(self, WorkflowStatus::OnHold | WorkflowStatus::Cancelled)
    }

    /// Whether the periodic alert sweep should look at this workflow.
    pub fn is_active(self) -> bool {
        !matches!(self, WorkflowStatus::Completed | WorkflowStatus::Cancelled)
    }
}

/// Status of a [`crate::tasks::Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        };
        f.pad(s)
    }
}

/// Classification of a due-date-relative alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Due date is approaching.
    Warning,
    /// Due today.
    Urgent,
    /// Past due, on one of the configured offsets.
    Overdue,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertKind::Warning => "warning",
            AlertKind::Urgent => "urgent",
            AlertKind::Overdue => "overdue",
        };
        f.pad(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Lead < Phase::Prospect);
        assert!(Phase::Execution < Phase::SecondSupplement);
        assert!(Phase::SecondSupplement < Phase::Completion);
        assert_eq!(Phase::ALL.len(), 6);
    }

    #[test]
    fn phase_parses_display_and_snake_names() {
        assert_eq!("2nd Supplement".parse::<Phase>(), Ok(Phase::SecondSupplement));
        assert_eq!("second_supplement".parse::<Phase>(), Ok(Phase::SecondSupplement));
        assert_eq!(" Execution ".parse::<Phase>(), Ok(Phase::Execution));
        assert!("closing".parse::<Phase>().is_err());
    }

    #[test]
    fn task_status_uses_display_strings_on_the_wire() {
        #[derive(Deserialize)]
        struct Wrapper {
            status: TaskStatus,
        }
        let w: Wrapper = toml::from_str(r#"status = "In Progress""#).unwrap();
        assert_eq!(w.status, TaskStatus::InProgress);
        assert_eq!(TaskStatus::ToDo.to_string(), "To Do");
    }

    #[test]
    fn execution_defaults_to_labor() {
        assert_eq!(Phase::Execution.default_category(), StepCategory::Labor);
        assert_eq!(Phase::Lead.default_category(), StepCategory::Admin);
    }
}
