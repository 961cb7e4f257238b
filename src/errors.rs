// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::TaskId;

#[derive(Error, Debug)]
pub enum PhaseflowError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Circular dependency for '{task}': {}", path.join(" -> "))]
    CircularDependency { task: String, path: Vec<String> },

    #[error("Task '{task}' cannot start; unfinished dependencies: {}", pending.join(", "))]
    DependencyNotSatisfied { task: TaskId, pending: Vec<TaskId> },

    #[error("Task not found: {0}")]
    UnknownTask(TaskId),

    #[error("Task already exists: {0}")]
    TaskExists(TaskId),

    #[error("Step not found: {0}")]
    UnknownStep(String),

    #[error("Task '{task}' was modified concurrently (expected version {expected}, found {found})")]
    ConcurrentModification {
        task: TaskId,
        expected: u64,
        found: u64,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PhaseflowError>;
