// src/tasks/mod.rs

//! Tasks with hard dependencies.
//!
//! - [`task`] is the work item itself.
//! - [`graph`] loads the dependency graph once and answers cycle and
//!   readiness questions synchronously.
//! - [`service`] is the validate-then-commit write path over a
//!   [`crate::store::TaskStore`].

pub mod graph;
pub mod service;
pub mod task;

pub use graph::TaskGraph;
pub use service::TaskService;
pub use task::Task;
