// src/workflow/project.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProjectId;

/// The slice of a project the workflow engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Trades involved in the job (e.g. `"roofing"`, `"gutters"`).
    #[serde(default)]
    pub trades: Vec<String>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date: None,
            end_date: None,
            trades: Vec::new(),
        }
    }
}
