// tests/property/scheduling.rs

use chrono::Duration;
use proptest::prelude::*;
use phaseflow::schedule::{ScheduleOptions, plan_spans};
use phaseflow::time::ceil_div;
use phaseflow_test_utils::day;

proptest! {
    // The final end equals start + Σ ceil(d_i * D / total) and every span is
    // non-negative and contiguous with the previous one.
    #[test]
    fn spans_sum_to_expected_window(
        durations in proptest::collection::vec(0u32..30, 1..25),
        window in 1i64..400,
    ) {
        let total: i64 = durations.iter().map(|&d| i64::from(d)).sum();
        prop_assume!(total > 0);

        let start = day(2024, 1, 1);
        let end = start + Duration::days(window);
        let spans = plan_spans(&durations, start, end, &ScheduleOptions::default()).unwrap();

        let expected: i64 = durations
            .iter()
            .map(|&d| ceil_div(i64::from(d) * window, total))
            .sum();
        prop_assert_eq!(spans.last().unwrap().end, start + Duration::days(expected));

        let mut cursor = start;
        for span in &spans {
            prop_assert_eq!(span.start, cursor);
            prop_assert!(span.end >= span.start);
            cursor = span.end;
        }
    }

    // With an empty or inverted window every step gets the minimum span.
    #[test]
    fn degenerate_window_uses_minimum_span(
        durations in proptest::collection::vec(1u32..10, 1..10),
        back in 0i64..30,
        min in 1u32..4,
    ) {
        let start = day(2024, 6, 1);
        let end = start - Duration::days(back);
        let opts = ScheduleOptions { min_step_days: min };
        let spans = plan_spans(&durations, start, end, &opts).unwrap();

        for span in &spans {
            prop_assert_eq!(span.days, i64::from(min));
        }
        let expected = start + Duration::days(i64::from(min) * durations.len() as i64);
        prop_assert_eq!(spans.last().unwrap().end, expected);
    }
}
