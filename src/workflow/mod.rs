// src/workflow/mod.rs

//! Workflow data model.
//!
//! - [`step`] holds a single step, its sub-tasks and alert configuration.
//! - [`template`] defines step templates and the built-in phase checklist.
//! - [`workflow`] is the per-project ordered step list plus completion
//!   bookkeeping.
//! - [`project`] is the slice of a project the engine reads.

pub mod project;
pub mod step;
pub mod template;
#[allow(clippy::module_inception)]
pub mod workflow;

pub use project::Project;
pub use step::{AlertTrigger, Step, SubTask};
pub use template::{StepTemplate, default_template};
pub use workflow::Workflow;
