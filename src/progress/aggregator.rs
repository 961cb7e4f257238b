// src/progress/aggregator.rs

use tracing::debug;

use crate::progress::report::{PhaseProgress, ProgressReport, TradeProgress};
use crate::types::{Phase, StepCategory};
use crate::workflow::{Project, Step, Workflow};

/// `completed / total * 100`, rounded half up; `0` when `total == 0`.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((completed * 200 + total) / (2 * total)) as u8
}

fn completion_of<'a>(steps: impl Iterator<Item = &'a Step>) -> (usize, usize) {
    steps.fold((0, 0), |(done, total), s| {
        (done + usize::from(s.is_completed), total + 1)
    })
}

/// Steps of `category` tagged with `trade`, or the untagged ones when none
/// are tagged.
fn steps_for_trade<'a>(steps: &'a [Step], category: StepCategory, trade: &str) -> Vec<&'a Step> {
    let of_category = || steps.iter().filter(move |s| s.category() == category);

    let tagged: Vec<&Step> = of_category()
        .filter(|s| {
            s.trade
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(trade))
        })
        .collect();
    if !tagged.is_empty() {
        return tagged;
    }
    of_category().filter(|s| s.trade.is_none()).collect()
}

/// Roll step completion up into project-level percentages.
///
/// A missing workflow is not an error: the report is all zeros with
/// `has_workflow = false`.
pub fn aggregate(project: &Project, workflow: Option<&Workflow>) -> ProgressReport {
    let Some(workflow) = workflow else {
        debug!(project = %project.id, "no workflow; reporting empty progress");
        return ProgressReport::empty();
    };
    let steps = workflow.steps.as_slice();

    let (completed_steps, total_steps) = completion_of(steps.iter());
    let (materials_done, materials_total) =
        completion_of(steps.iter().filter(|s| s.category() == StepCategory::Materials));
    let (labor_done, labor_total) =
        completion_of(steps.iter().filter(|s| s.category() == StepCategory::Labor));

    let phases = Phase::ALL
        .iter()
        .filter_map(|&phase| {
            let (completed, total) = completion_of(steps.iter().filter(|s| s.phase == phase));
            (total > 0).then_some(PhaseProgress {
                phase,
                completed,
                total,
            })
        })
        .collect();

    let trades = project
        .trades
        .iter()
        .map(|name| {
            let labor = steps_for_trade(steps, StepCategory::Labor, name);
            let materials = steps_for_trade(steps, StepCategory::Materials, name);
            let (done, total) = completion_of(labor.into_iter());
            TradeProgress {
                name: name.clone(),
                labor_progress: percentage(done, total),
                materials_delivered: !materials.is_empty()
                    && materials.iter().all(|s| s.is_completed),
            }
        })
        .collect();

    let report = ProgressReport {
        has_workflow: true,
        overall: percentage(completed_steps, total_steps),
        materials: percentage(materials_done, materials_total),
        labor: percentage(labor_done, labor_total),
        completed_steps,
        total_steps,
        phases,
        trades,
    };
    debug!(
        project = %project.id,
        overall = report.overall,
        materials = report.materials,
        labor = report.labor,
        "aggregated progress"
    );
    report
}
