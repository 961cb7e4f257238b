// src/progress/mod.rs

//! Weighted completion roll-up for dashboards.

pub mod aggregator;
pub mod report;

pub use aggregator::{aggregate, percentage};
pub use report::{PhaseProgress, ProgressReport, TradeProgress};
