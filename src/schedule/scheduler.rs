// src/schedule/scheduler.rs

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::{PhaseflowError, Result};
use crate::time::{add_days, ceil_days_between, ceil_div};
use crate::workflow::Step;

/// Knobs for degenerate windows, from `[schedule]` in `Phaseflow.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Span, in days, given to every step when the project window is empty
    /// or inverted (`end <= start`).
    pub min_step_days: u32,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self { min_step_days: 1 }
    }
}

/// Planned interval for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub days: i64,
}

/// Compute spans for the given durations without touching any step.
///
/// Each step gets `ceil(duration * window_days / total)` days, computed in
/// integer arithmetic so that e.g. `2 * 6 / 6` is exactly 2. When
/// `window_days <= 0` every step gets `min_step_days` instead.
///
/// Fails with [`PhaseflowError::InvalidSchedule`] when the list is empty,
/// the durations sum to zero or a span runs past the supported date range.
pub fn plan_spans(
    durations: &[u32],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    options: &ScheduleOptions,
) -> Result<Vec<ScheduledSpan>> {
    if durations.is_empty() {
        return Err(PhaseflowError::InvalidSchedule(
            "cannot schedule an empty step list".to_string(),
        ));
    }

    let total: i64 = durations.iter().map(|&d| i64::from(d)).sum();
    if total == 0 {
        return Err(PhaseflowError::InvalidSchedule(format!(
            "total estimated duration of {} steps is 0 days",
            durations.len()
        )));
    }

    let window_days = ceil_days_between(start, end);
    let degenerate = window_days <= 0;
    if degenerate {
        warn!(
            %start,
            %end,
            window_days,
            min_step_days = options.min_step_days,
            "project window is empty; collapsing every step to the minimum span"
        );
    }

    let mut cursor = start;
    let mut spans = Vec::with_capacity(durations.len());

    for &duration in durations {
        let days = if degenerate {
            i64::from(options.min_step_days)
        } else {
            ceil_div(i64::from(duration) * window_days, total)
        };

        let step_start = cursor;
        cursor = add_days(cursor, days).ok_or_else(|| {
            PhaseflowError::InvalidSchedule(format!(
                "step span of {days} days starting {step_start} runs past the supported date range"
            ))
        })?;
        spans.push(ScheduledSpan {
            start: step_start,
            end: cursor,
            days,
        });
    }

    Ok(spans)
}

/// Assign `scheduled_start` / `scheduled_end` to every step, in order, and
/// return the estimated completion date (the end of the last step).
///
/// On error no step is modified.
pub fn schedule_steps(
    steps: &mut [Step],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    options: &ScheduleOptions,
) -> Result<DateTime<Utc>> {
    let durations: Vec<u32> = steps.iter().map(|s| s.estimated_days).collect();
    let spans = plan_spans(&durations, start, end, options)?;

    for (step, span) in steps.iter_mut().zip(spans.iter()) {
        debug!(
            step = %step.id,
            estimated_days = step.estimated_days,
            span_days = span.days,
            start = %span.start,
            end = %span.end,
            "scheduled step"
        );
        step.scheduled_start = Some(span.start);
        step.scheduled_end = Some(span.end);
    }

    // `plan_spans` never returns an empty list.
    Ok(spans.last().map(|s| s.end).unwrap_or(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn steps(durations: &[u32]) -> Vec<Step> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let mut s = Step::new(format!("s{i}"), format!("Step {i}"), Phase::Execution);
                s.estimated_days = d;
                s
            })
            .collect()
    }

    #[test]
    fn equal_durations_split_window_evenly() {
        let mut s = steps(&[2, 2, 2]);
        let done = schedule_steps(&mut s, day(1), day(7), &ScheduleOptions::default()).unwrap();

        let got: Vec<_> = s
            .iter()
            .map(|s| (s.scheduled_start.unwrap(), s.scheduled_end.unwrap()))
            .collect();
        assert_eq!(
            got,
            vec![(day(1), day(3)), (day(3), day(5)), (day(5), day(7))]
        );
        assert_eq!(done, day(7));
    }

    #[test]
    fn spans_are_rounded_up_per_step() {
        // 1/3 * 10 = 3.33 -> 4, 2/3 * 10 = 6.67 -> 7; total overshoots to 11.
        let spans = plan_spans(&[1, 2], day(1), day(11), &ScheduleOptions::default()).unwrap();
        assert_eq!(spans[0].days, 4);
        assert_eq!(spans[1].days, 7);
        assert_eq!(spans[1].end, day(12));
    }

    #[test]
    fn empty_or_zero_total_is_rejected_without_mutation() {
        let mut none: Vec<Step> = Vec::new();
        assert!(matches!(
            schedule_steps(&mut none, day(1), day(7), &ScheduleOptions::default()),
            Err(PhaseflowError::InvalidSchedule(_))
        ));

        let mut zeros = steps(&[0, 0]);
        assert!(matches!(
            schedule_steps(&mut zeros, day(1), day(7), &ScheduleOptions::default()),
            Err(PhaseflowError::InvalidSchedule(_))
        ));
        assert!(zeros.iter().all(|s| s.scheduled_start.is_none()));
    }

    #[test]
    fn empty_window_collapses_to_minimum_span() {
        let mut s = steps(&[3, 1]);
        let done = schedule_steps(&mut s, day(5), day(5), &ScheduleOptions::default()).unwrap();
        assert_eq!(s[0].scheduled_start, Some(day(5)));
        assert_eq!(s[0].scheduled_end, Some(day(6)));
        assert_eq!(s[1].scheduled_end, Some(day(7)));
        assert_eq!(done, day(7));

        let wide = ScheduleOptions { min_step_days: 2 };
        let spans = plan_spans(&[1], day(9), day(3), &wide).unwrap();
        assert_eq!(spans[0].end, day(11));
    }

    #[test]
    fn span_past_the_date_range_is_an_error() {
        let huge = ScheduleOptions {
            min_step_days: 200_000_000,
        };
        assert!(matches!(
            plan_spans(&[1, 1], day(5), day(1), &huge),
            Err(PhaseflowError::InvalidSchedule(_))
        ));

        let mut s = steps(&[1]);
        let near_end = DateTime::<Utc>::MAX_UTC - chrono::Duration::hours(1);
        let wide = ScheduleOptions { min_step_days: 2 };
        assert!(schedule_steps(&mut s, near_end, near_end, &wide).is_err());
        assert!(s[0].scheduled_start.is_none());
    }

    #[test]
    fn zero_duration_step_gets_empty_interval() {
        let mut s = steps(&[0, 3]);
        schedule_steps(&mut s, day(1), day(4), &ScheduleOptions::default()).unwrap();
        assert_eq!(s[0].scheduled_start, s[0].scheduled_end);
        assert_eq!(s[1].scheduled_start, Some(day(1)));
        assert_eq!(s[1].scheduled_end, Some(day(4)));
    }
}
