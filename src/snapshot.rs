// src/snapshot.rs

//! TOML snapshot of projects, workflows and tasks.
//!
//! Used by the CLI to run the engine against data exported from the
//! application store:
//!
//! ```toml
//! [[project]]
//! id = "p1"
//! name = "Smith residence"
//! start_date = "2024-01-01T00:00:00Z"
//! end_date = "2024-03-01T00:00:00Z"
//! trades = ["roofing", "gutters"]
//!
//! [[workflow]]
//! project_id = "p1"
//!
//! [[workflow.steps]]
//! id = "inspect"
//! name = "Site inspection"
//! phase = "prospect"
//! role = "sales"
//! estimated_days = 2
//! scheduled_end = "2024-01-05T00:00:00Z"
//!
//! [[task]]
//! id = "t1"
//! project_id = "p1"
//! status = "To Do"
//! depends_on = []
//! ```
//!
//! Timestamps are quoted RFC 3339 strings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::tasks::Task;
use crate::workflow::{Project, Workflow};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, rename = "project")]
    pub projects: Vec<Project>,

    #[serde(default, rename = "workflow")]
    pub workflows: Vec<Workflow>,

    #[serde(default, rename = "task")]
    pub tasks: Vec<Task>,
}

impl Snapshot {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Read and parse a snapshot file.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
    let contents = fs::read_to_string(path.as_ref())?;
    Snapshot::from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Phase, TaskStatus};

    #[test]
    fn parses_all_sections() {
        let snap = Snapshot::from_toml_str(
            r#"
[[project]]
id = "p1"
trades = ["roofing"]
start_date = "2024-01-01T00:00:00Z"

[[workflow]]
project_id = "p1"

[[workflow.steps]]
id = "inspect"
name = "Site inspection"
phase = "prospect"
role = "sales"
estimated_days = 2
alert = { priority = "high" }

[[task]]
id = "t1"
project_id = "p1"
status = "In Progress"
depends_on = ["t0"]
"#,
        )
        .unwrap();

        assert_eq!(snap.projects[0].trades, vec!["roofing".to_string()]);
        assert!(snap.projects[0].start_date.is_some());
        assert_eq!(snap.workflows[0].steps[0].phase, Phase::Prospect);
        assert_eq!(snap.tasks[0].status, TaskStatus::InProgress);
        assert_eq!(snap.tasks[0].depends_on, vec!["t0".to_string()]);
    }

    #[test]
    fn unknown_phase_is_a_parse_error() {
        let err = Snapshot::from_toml_str(
            r#"
[[workflow]]
project_id = "p1"

[[workflow.steps]]
id = "x"
name = "X"
phase = "closing"
role = "office"
estimated_days = 1
"#,
        );
        assert!(err.is_err());
    }
}
