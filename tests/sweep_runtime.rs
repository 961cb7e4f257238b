// tests/sweep_runtime.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use phaseflow::alerts::AlertDefaults;
use phaseflow::engine::{ChannelSink, SweepCore, SweepOptions, SweepRuntime};
use phaseflow::store::{MemoryStore, WorkflowStore};
use phaseflow::types::{AlertKind, Phase, WorkflowStatus};
use phaseflow_test_utils::builders::{StepBuilder, WorkflowBuilder};
use phaseflow_test_utils::recording_sink::RecordingSink;
use phaseflow_test_utils::{day, init_tracing, with_timeout};
use tokio::sync::{mpsc, watch};

fn store_with(workflows: Vec<phaseflow::workflow::Workflow>) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for wf in workflows {
        store.save_workflow(wf).unwrap();
    }
    Arc::new(store)
}

fn options(max_concurrent: usize) -> SweepOptions {
    SweepOptions {
        interval: Duration::from_secs(3600),
        max_concurrent,
    }
}

#[tokio::test]
async fn repeated_ticks_deliver_each_alert_once() {
    init_tracing();
    let now = day(2024, 2, 10);

    let store = store_with(vec![
        WorkflowBuilder::new("p1")
            .step(StepBuilder::new("due_today", Phase::Execution).due(now).build())
            .build(),
        WorkflowBuilder::new("p2")
            .step(
                StepBuilder::new("late", Phase::Execution)
                    .due(day(2024, 2, 9))
                    .build(),
            )
            .build(),
    ]);
    let sink = RecordingSink::new();
    let mut runtime = SweepRuntime::new(
        SweepCore::new(AlertDefaults::default()),
        store,
        sink.clone(),
        options(1),
    );

    let first = runtime.tick(now).await.unwrap();
    assert_eq!(first.workflows_evaluated, 2);
    assert_eq!(first.new_events.len(), 2);

    let second = runtime.tick(now + chrono::Duration::hours(2)).await.unwrap();
    assert!(second.new_events.is_empty());
    assert_eq!(second.suppressed, 2);

    let delivered = sink.delivered();
    assert_eq!(sink.batches(), 1);
    assert_eq!(delivered[0].project_id, "p1");
    assert_eq!(delivered[0].kind, AlertKind::Urgent);
    assert_eq!(delivered[1].project_id, "p2");
    assert_eq!(delivered[1].kind, AlertKind::Overdue);
    assert_eq!(delivered[1].offset_days, 1);
}

#[tokio::test]
async fn inactive_workflows_are_not_swept() {
    let now = day(2024, 2, 10);
    let store = store_with(vec![
        WorkflowBuilder::new("done")
            .status(WorkflowStatus::Completed)
            .step(StepBuilder::new("x", Phase::Completion).due(now).build())
            .build(),
        WorkflowBuilder::new("cancelled")
            .status(WorkflowStatus::Cancelled)
            .step(StepBuilder::new("y", Phase::Lead).due(now).build())
            .build(),
        WorkflowBuilder::new("paused")
            .status(WorkflowStatus::OnHold)
            .step(StepBuilder::new("z", Phase::Lead).due(now).build())
            .build(),
    ]);
    let sink = RecordingSink::new();
    let mut runtime = SweepRuntime::new(
        SweepCore::new(AlertDefaults::default()),
        store,
        sink.clone(),
        options(4),
    );

    let step = runtime.tick(now).await.unwrap();
    assert_eq!(step.workflows_evaluated, 1);
    assert_eq!(sink.delivered().len(), 1);
    assert_eq!(sink.delivered()[0].project_id, "paused");
}

#[tokio::test]
async fn results_keep_workflow_order_under_parallel_evaluation() {
    let now = day(2024, 2, 10);
    let workflows = (0..12)
        .map(|i| {
            WorkflowBuilder::new(&format!("p{i:02}"))
                .step(StepBuilder::new("s", Phase::Execution).due(now).build())
                .build()
        })
        .collect();
    let sink = RecordingSink::new();
    let mut runtime = SweepRuntime::new(
        SweepCore::new(AlertDefaults::default()),
        store_with(workflows),
        sink.clone(),
        options(3),
    );

    runtime.tick(now).await.unwrap();
    let projects: Vec<String> = sink
        .delivered()
        .into_iter()
        .map(|e| e.project_id)
        .collect();
    let mut sorted = projects.clone();
    sorted.sort();
    assert_eq!(projects.len(), 12);
    assert_eq!(projects, sorted);
}

#[tokio::test]
async fn once_mode_runs_a_single_tick() {
    let due = Utc::now() + chrono::Duration::hours(12);
    let store = store_with(vec![
        WorkflowBuilder::new("p1")
            .step(StepBuilder::new("soon", Phase::Approved).due(due).build())
            .build(),
    ]);
    let sink = RecordingSink::new();
    let runtime = SweepRuntime::new(
        SweepCore::new(AlertDefaults::default()),
        store,
        sink.clone(),
        options(2),
    );

    let (_tx, rx) = watch::channel(false);
    with_timeout(runtime.run(rx, true)).await.unwrap();

    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].kind, AlertKind::Warning);
    assert_eq!(delivered[0].offset_days, 1);
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let sink = RecordingSink::new();
    let runtime = SweepRuntime::new(
        SweepCore::new(AlertDefaults::default()),
        store_with(Vec::new()),
        sink.clone(),
        options(2),
    );

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(runtime.run(rx, false));
    tx.send(true).unwrap();

    with_timeout(handle).await.unwrap().unwrap();
    assert_eq!(sink.batches(), 0);
}

#[tokio::test]
async fn failed_delivery_is_retried_on_the_next_tick() {
    init_tracing();
    let now = day(2024, 2, 10);
    let store = store_with(vec![
        WorkflowBuilder::new("p1")
            .step(
                StepBuilder::new("late", Phase::Execution)
                    .due(day(2024, 2, 9))
                    .build(),
            )
            .build(),
    ]);
    let sink = RecordingSink::failing_first(1);
    let mut runtime = SweepRuntime::new(
        SweepCore::new(AlertDefaults::default()),
        store,
        sink.clone(),
        options(1),
    );

    assert!(runtime.tick(now).await.is_err());
    assert!(sink.delivered().is_empty());
    assert_eq!(runtime.core().delivered_len(), 0);

    let retry = runtime.tick(now + chrono::Duration::hours(1)).await.unwrap();
    assert_eq!(retry.new_events.len(), 1);
    assert_eq!(retry.suppressed, 0);

    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].kind, AlertKind::Overdue);
    assert_eq!(delivered[0].offset_days, 1);

    let third = runtime.tick(now + chrono::Duration::hours(2)).await.unwrap();
    assert!(third.new_events.is_empty());
    assert_eq!(third.suppressed, 1);
}

#[tokio::test]
async fn channel_sink_forwards_alerts_in_order() {
    let now = day(2024, 2, 10);
    let store = store_with(vec![
        WorkflowBuilder::new("p1")
            .step(StepBuilder::new("due_today", Phase::Execution).due(now).build())
            .build(),
        WorkflowBuilder::new("p2")
            .step(
                StepBuilder::new("late", Phase::Execution)
                    .due(day(2024, 2, 9))
                    .build(),
            )
            .build(),
    ]);
    let (tx, mut rx) = mpsc::channel(8);
    let mut runtime = SweepRuntime::new(
        SweepCore::new(AlertDefaults::default()),
        store,
        ChannelSink::new(tx),
        options(2),
    );

    runtime.tick(now).await.unwrap();

    let first = rx.recv().await.unwrap();
    assert_eq!(first.project_id, "p1");
    assert_eq!(first.step_id, "due_today");
    assert_eq!(first.kind, AlertKind::Urgent);
    let second = rx.recv().await.unwrap();
    assert_eq!(second.project_id, "p2");
    assert_eq!(second.kind, AlertKind::Overdue);
    assert!(rx.try_recv().is_err());

    // Already delivered; nothing new goes over the channel.
    runtime.tick(now + chrono::Duration::hours(1)).await.unwrap();
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn channel_sink_with_closed_receiver_fails_the_tick() {
    let now = day(2024, 2, 10);
    let store = store_with(vec![
        WorkflowBuilder::new("p1")
            .step(StepBuilder::new("due_today", Phase::Execution).due(now).build())
            .build(),
    ]);
    let (tx, rx) = mpsc::channel(8);
    drop(rx);
    let mut runtime = SweepRuntime::new(
        SweepCore::new(AlertDefaults::default()),
        store,
        ChannelSink::new(tx),
        options(1),
    );

    assert!(runtime.tick(now).await.is_err());
    assert_eq!(runtime.core().delivered_len(), 0);
}
