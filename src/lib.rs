// src/lib.rs

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod progress;
pub mod schedule;
pub mod snapshot;
pub mod store;
pub mod tasks;
pub mod time;
pub mod types;
pub mod workflow;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::commands::{check_projects, plan_template, run_sweep, task_overview};
use crate::config::{ConfigFile, load_or_default};
use crate::engine::LogSink;
use crate::errors::Result;
use crate::progress::ProgressReport;
use crate::snapshot::load_snapshot;
use crate::store::MemoryStore;

/// High-level entry point used by `main.rs`.
///
/// Loads the config (defaults when the file is absent) and dispatches the
/// subcommand. Reports go to stdout, logs to stderr.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)?;
    debug!(config = %args.config, steps = cfg.template.len(), "configuration loaded");

    match args.command {
        Command::Template { start, end } => print_template(&cfg, start, end),
        Command::Check { snapshot, now } => check(&cfg, &snapshot, now.unwrap_or_else(Utc::now)),
        Command::Tasks { snapshot } => print_tasks(&snapshot),
        Command::Sweep { snapshot, once } => sweep(&cfg, &snapshot, once).await,
    }
}

fn print_template(cfg: &ConfigFile, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    let plan = plan_template(cfg, start, end)?;

    println!("phaseflow template ({} steps)", plan.workflow.steps.len());
    for step in &plan.workflow.steps {
        let (Some(s), Some(e)) = (step.scheduled_start, step.scheduled_end) else {
            continue;
        };
        println!(
            "  {:<28} {:<18} {} .. {}  ({}d, {})",
            step.id,
            step.phase.display_name(),
            s.format("%Y-%m-%d"),
            e.format("%Y-%m-%d"),
            step.estimated_days,
            step.role,
        );
    }
    println!("estimated completion: {}", plan.completion.format("%Y-%m-%d"));
    Ok(())
}

fn check(cfg: &ConfigFile, snapshot: &Path, now: DateTime<Utc>) -> Result<()> {
    let store = MemoryStore::from_snapshot(load_snapshot(snapshot)?)?;
    let checks = check_projects(&store, &cfg.alert_defaults(), now)?;

    println!("phaseflow check at {}", now.to_rfc3339());
    for check in &checks {
        println!();
        println!("project {} ({})", check.project.id, check.project.name);
        if check.alerts.is_empty() {
            println!("  alerts: none");
        } else {
            println!("  alerts:");
            for a in &check.alerts {
                println!(
                    "    - {:<8} {} [{}] offset {}d",
                    a.kind, a.step_name, a.step_id, a.offset_days
                );
            }
        }
        print_report(&check.report);
    }
    Ok(())
}

fn print_report(report: &ProgressReport) {
    if !report.has_workflow {
        println!("  progress: no workflow");
        return;
    }
    println!(
        "  progress: {}% overall ({}/{} steps), materials {}%, labor {}%",
        report.overall, report.completed_steps, report.total_steps, report.materials, report.labor
    );
    for p in &report.phases {
        println!("    {:<18} {}/{}", p.phase.display_name(), p.completed, p.total);
    }
    for t in &report.trades {
        println!(
            "    trade {:<12} labor {}%, materials delivered: {}",
            t.name, t.labor_progress, t.materials_delivered
        );
    }
}

fn print_tasks(snapshot: &Path) -> Result<()> {
    let store = MemoryStore::from_snapshot(load_snapshot(snapshot)?)?;
    let overview = task_overview(&store)?;

    println!("phaseflow tasks ({})", overview.total);
    println!("order: {}", overview.order.join(" -> "));
    for task in &overview.open {
        if task.is_ready() {
            println!("  {:<16} {:<12} ready", task.id, task.status);
        } else {
            println!(
                "  {:<16} {:<12} waiting on {}",
                task.id,
                task.status,
                task.pending.join(", ")
            );
        }
    }
    Ok(())
}

async fn sweep(cfg: &ConfigFile, snapshot: &Path, once: bool) -> Result<()> {
    let store = Arc::new(MemoryStore::from_snapshot(load_snapshot(snapshot)?)?);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Ctrl-C → graceful shutdown.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    run_sweep(cfg, store, LogSink, shutdown_rx, once).await
}
