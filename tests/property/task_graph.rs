// tests/property/task_graph.rs

use std::collections::HashSet;

use proptest::prelude::*;
use phaseflow::errors::PhaseflowError;
use phaseflow::tasks::{Task, TaskGraph};
use phaseflow_test_utils::builders::TaskBuilder;

// Strategy to generate an acyclic task set.
// Task N may only depend on tasks 0..N-1.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_tasks,
        )
        .prop_map(|raw_deps| {
            raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    let mut builder = TaskBuilder::new(&format!("t{i}"));
                    if i > 0 {
                        let deps: HashSet<usize> = potential.into_iter().map(|d| d % i).collect();
                        for d in deps {
                            builder = builder.after(&format!("t{d}"));
                        }
                    }
                    builder.build()
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn existing_edges_of_a_dag_validate(tasks in dag_strategy(30)) {
        let graph = TaskGraph::from_tasks(&tasks);
        for t in &tasks {
            prop_assert!(graph.validate_no_cycle(&t.id, &t.depends_on).is_ok());
        }

        let order = graph.topological_order().unwrap();
        prop_assert_eq!(order.len(), tasks.len());
        let pos = |id: &str| order.iter().position(|o| o == id).unwrap();
        for t in &tasks {
            for d in &t.depends_on {
                prop_assert!(pos(d) < pos(&t.id));
            }
        }
    }

    // Pointing an earlier task at any later task that (transitively) depends
    // on it closes a cycle and must be rejected.
    #[test]
    fn back_edge_onto_a_descendant_is_rejected(tasks in dag_strategy(20)) {
        let graph = TaskGraph::from_tasks(&tasks);
        for t in &tasks {
            for d in &t.depends_on {
                let res = graph.validate_no_cycle(d, std::slice::from_ref(&t.id));
                let is_cycle = matches!(res, Err(PhaseflowError::CircularDependency { .. }));
                prop_assert!(is_cycle);
            }
        }
    }
}
