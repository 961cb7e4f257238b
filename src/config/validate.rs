// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PhaseflowError, Result};
use crate::workflow::StepTemplate;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PhaseflowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_alerts(cfg)?;
    validate_schedule_and_sweep(cfg)?;
    if !cfg.step.is_empty() {
        validate_template(&cfg.step)?;
    }
    Ok(())
}

fn validate_alerts(cfg: &RawConfigFile) -> Result<()> {
    let intervals = &cfg.alerts.overdue_intervals;

    if let Some(bad) = intervals.iter().find(|&&i| i == 0) {
        return Err(PhaseflowError::ConfigError(format!(
            "[alerts].overdue_intervals entries must be >= 1 (got {bad})"
        )));
    }
    if intervals.windows(2).any(|w| w[0] >= w[1]) {
        return Err(PhaseflowError::ConfigError(format!(
            "[alerts].overdue_intervals must be strictly ascending (got {intervals:?})"
        )));
    }
    Ok(())
}

/// Upper bound for `[schedule].min_step_days` (about ten years).
pub const MAX_MIN_STEP_DAYS: u32 = 3650;

fn validate_schedule_and_sweep(cfg: &RawConfigFile) -> Result<()> {
    let min_step_days = cfg.schedule.min_step_days;
    if min_step_days == 0 || min_step_days > MAX_MIN_STEP_DAYS {
        return Err(PhaseflowError::ConfigError(format!(
            "[schedule].min_step_days must be between 1 and {MAX_MIN_STEP_DAYS} (got {min_step_days})"
        )));
    }
    if cfg.sweep.interval_secs == 0 {
        return Err(PhaseflowError::ConfigError(
            "[sweep].interval_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.sweep.max_concurrent == 0 {
        return Err(PhaseflowError::ConfigError(
            "[sweep].max_concurrent must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

/// Check a step template: unique ids, known soft dependencies, phases in
/// order, a schedulable total duration, and an acyclic dependency graph.
pub fn validate_template(steps: &[StepTemplate]) -> Result<()> {
    if steps.is_empty() {
        return Err(PhaseflowError::ConfigError(
            "template must contain at least one [[step]]".to_string(),
        ));
    }

    let mut ids = HashSet::new();
    for step in steps {
        if step.id.trim().is_empty() {
            return Err(PhaseflowError::ConfigError(format!(
                "step '{}' has an empty id",
                step.name
            )));
        }
        if !ids.insert(step.id.as_str()) {
            return Err(PhaseflowError::ConfigError(format!(
                "duplicate step id '{}'",
                step.id
            )));
        }
    }

    for step in steps {
        for dep in &step.depends_on {
            if dep == &step.id {
                return Err(PhaseflowError::ConfigError(format!(
                    "step '{}' cannot depend on itself",
                    step.id
                )));
            }
            if !ids.contains(dep.as_str()) {
                return Err(PhaseflowError::ConfigError(format!(
                    "step '{}' has unknown dependency '{}'",
                    step.id, dep
                )));
            }
        }
    }

    if let Some(w) = steps.windows(2).find(|w| w[0].phase > w[1].phase) {
        return Err(PhaseflowError::ConfigError(format!(
            "step '{}' ({}) is listed after '{}' ({}); steps must follow phase order",
            w[1].id, w[1].phase, w[0].id, w[0].phase
        )));
    }

    if steps.iter().all(|s| s.estimated_days == 0) {
        return Err(PhaseflowError::ConfigError(
            "template total estimated_days must be >= 1".to_string(),
        ));
    }

    // Edge direction: dep -> step.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for step in steps {
        graph.add_node(step.id.as_str());
    }
    for step in steps {
        for dep in &step.depends_on {
            graph.add_edge(dep.as_str(), step.id.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(PhaseflowError::CircularDependency {
                task: node.to_string(),
                path: vec![node.to_string()],
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;

    fn s(id: &str, phase: Phase, deps: &[&str]) -> StepTemplate {
        StepTemplate::new(id, id, phase, "office", 1).after(deps)
    }

    #[test]
    fn cyclic_soft_dependencies_are_rejected() {
        let steps = vec![
            s("a", Phase::Lead, &["b"]),
            s("b", Phase::Lead, &["a"]),
        ];
        assert!(matches!(
            validate_template(&steps),
            Err(PhaseflowError::CircularDependency { .. })
        ));
    }

    #[test]
    fn phase_order_is_enforced() {
        let steps = vec![s("a", Phase::Execution, &[]), s("b", Phase::Lead, &[])];
        match validate_template(&steps) {
            Err(PhaseflowError::ConfigError(msg)) => assert!(msg.contains("phase order")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_and_unknown_ids() {
        let dup = vec![s("a", Phase::Lead, &[]), s("a", Phase::Lead, &[])];
        assert!(matches!(validate_template(&dup), Err(PhaseflowError::ConfigError(_))));

        let unknown = vec![s("a", Phase::Lead, &["ghost"])];
        match validate_template(&unknown) {
            Err(PhaseflowError::ConfigError(msg)) => assert!(msg.contains("ghost")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn zero_total_duration_is_rejected() {
        let steps = vec![StepTemplate::new("a", "A", Phase::Lead, "office", 0)];
        assert!(validate_template(&steps).is_err());
    }

    #[test]
    fn intervals_must_ascend() {
        let mut raw = RawConfigFile::default();
        raw.alerts.overdue_intervals = vec![3, 1];
        assert!(ConfigFile::try_from(raw).is_err());

        let mut raw = RawConfigFile::default();
        raw.alerts.overdue_intervals = vec![0, 2];
        assert!(ConfigFile::try_from(raw).is_err());

        let mut raw = RawConfigFile::default();
        raw.alerts.overdue_intervals = vec![];
        assert!(ConfigFile::try_from(raw).is_ok());
    }

    #[test]
    fn min_step_days_is_bounded() {
        let mut raw = RawConfigFile::default();
        raw.schedule.min_step_days = 0;
        assert!(ConfigFile::try_from(raw).is_err());

        let mut raw = RawConfigFile::default();
        raw.schedule.min_step_days = 200_000_000;
        match ConfigFile::try_from(raw) {
            Err(PhaseflowError::ConfigError(msg)) => assert!(msg.contains("min_step_days"), "{msg}"),
            other => panic!("expected config error, got {other:?}"),
        }

        let mut raw = RawConfigFile::default();
        raw.schedule.min_step_days = MAX_MIN_STEP_DAYS;
        assert!(ConfigFile::try_from(raw).is_ok());
    }
}
