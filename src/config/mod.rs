// src/config/mod.rs

//! Configuration loading and validation for phaseflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate invariants such as ascending alert intervals and a well-formed
//!   step template (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    AlertDaysSection, AlertsSection, ConfigFile, RawConfigFile, ScheduleSection, SweepSection,
};
pub use validate::validate_template;
