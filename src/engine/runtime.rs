// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::alerts::{AlertDefaults, AlertEvent, evaluate};
use crate::errors::{Error, Result};
use crate::store::WorkflowStore;

use super::core::{SweepCore, SweepStep};
use super::sink::AlertSink;
use super::SweepOptions;

/// Periodic alert sweep.
///
/// On every tick this loads the active workflows (each one a consistent
/// snapshot), evaluates them in parallel, runs the results through the
/// core's delivery dedup and hands new alerts to the sink. Alerts are only
/// remembered as delivered once the sink returns `Ok`; after a failed
/// delivery the next tick offers them again.
///
/// Workflows are independent, so parallel evaluation needs no shared
/// mutable state; only the dedup merge is sequential.
pub struct SweepRuntime<W: WorkflowStore + 'static, K: AlertSink> {
    core: SweepCore,
    store: Arc<W>,
    sink: K,
    options: SweepOptions,
}

impl<W: WorkflowStore + 'static, K: AlertSink> fmt::Debug for SweepRuntime<W, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SweepRuntime")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<W: WorkflowStore + 'static, K: AlertSink> SweepRuntime<W, K> {
    pub fn new(core: SweepCore, store: Arc<W>, sink: K, options: SweepOptions) -> Self {
        Self {
            core,
            store,
            sink,
            options,
        }
    }

    pub fn core(&self) -> &SweepCore {
        &self.core
    }

    /// Run one sweep at `now`.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Result<SweepStep> {
        let workflows = self.store.active_workflows()?;
        let projects: Vec<String> = workflows.iter().map(|wf| wf.project_id.clone()).collect();
        debug!(workflows = workflows.len(), %now, "sweep tick");

        let defaults = Arc::new(self.core.defaults().clone());
        let permits = Arc::new(Semaphore::new(self.options.max_concurrent.max(1)));
        let mut set: JoinSet<(usize, Vec<AlertEvent>)> = JoinSet::new();

        for (i, wf) in workflows.into_iter().enumerate() {
            let defaults: Arc<AlertDefaults> = Arc::clone(&defaults);
            let permits = Arc::clone(&permits);
            set.spawn(async move {
                let _permit = permits.acquire_owned().await;
                (i, evaluate(&wf.project_id, &wf.steps, now, &defaults))
            });
        }

        let mut per_workflow: Vec<Vec<AlertEvent>> = vec![Vec::new(); projects.len()];
        while let Some(joined) = set.join_next().await {
            let (i, events) = joined.map_err(Error::from)?;
            per_workflow[i] = events;
        }

        let step = self
            .core
            .accept(projects.iter().map(String::as_str), per_workflow);

        if !step.new_events.is_empty() {
            self.sink.deliver(step.new_events.clone()).await?;
            self.core.mark_delivered(&step.new_events);
        }
        info!(
            workflows = step.workflows_evaluated,
            delivered = step.new_events.len(),
            suppressed = step.suppressed,
            "sweep finished"
        );
        Ok(step)
    }

    /// Tick every `options.interval` until `shutdown` flips to `true` (or its
    /// sender is dropped). With `once`, stop after the first tick.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>, once: bool) -> Result<()> {
        info!(interval = ?self.options.interval, once, "alert sweep started");

        let mut interval = tokio::time::interval(self.options.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick(Utc::now()).await {
                        if once {
                            return Err(e);
                        }
                        warn!(error = %e, "sweep tick failed; retrying next interval");
                    }
                    if once {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("shutdown requested; stopping alert sweep");
                        break;
                    }
                }
            }
        }

        info!("alert sweep exiting");
        Ok(())
    }
}
