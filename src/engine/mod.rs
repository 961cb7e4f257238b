// src/engine/mod.rs

//! Periodic alert sweep.
//!
//! The pure dedup state lives in [`core`]; the async shell that loads
//! workflows, evaluates them concurrently and talks to the sink is
//! implemented in [`runtime`]. Where alerts end up is decided by an
//! [`AlertSink`] from [`sink`]. [`bootstrap`] attaches a scheduled
//! workflow to a newly created project.

use std::time::Duration;

/// Timing and parallelism for the sweep, from `[sweep]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    pub interval: Duration,
    /// Upper bound on workflows evaluated at the same time.
    pub max_concurrent: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            max_concurrent: 8,
        }
    }
}

pub mod bootstrap;
pub mod core;
pub mod runtime;
pub mod sink;

pub use bootstrap::bootstrap_workflow;
pub use self::core::{SweepCore, SweepStep};
pub use runtime::SweepRuntime;
pub use sink::{AlertSink, ChannelSink, LogSink};
