// src/schedule/mod.rs

//! Proportional step scheduling.
//!
//! Spreads a project's `[start, end]` window across an ordered step list in
//! proportion to each step's estimated duration. See [`schedule_steps`].

pub mod scheduler;

pub use scheduler::{ScheduleOptions, ScheduledSpan, plan_spans, schedule_steps};
