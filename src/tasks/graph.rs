// src/tasks/graph.rs

//! In-memory task dependency graph.
//!
//! The whole graph is loaded once from a task snapshot; cycle checks and
//! readiness queries then run synchronously with no store access.
//!
//! Edge direction: task -> dependency. For `B.depends_on = ["A"]` we add
//! edge `B -> A`.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, warn};

use crate::errors::{PhaseflowError, Result};
use crate::tasks::task::Task;
use crate::types::{TaskId, TaskStatus};

#[derive(Debug, Clone)]
struct TaskNode {
    id: TaskId,
    status: TaskStatus,
}

/// Directed graph over all tasks, keyed by task id.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    graph: DiGraph<TaskNode, ()>,
    index: HashMap<TaskId, NodeIndex>,
}

/// DFS frame: a node plus the successors still to visit.
struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
}

impl TaskGraph {
    /// Build the graph from a full task snapshot.
    ///
    /// References to ids that are not in the snapshot are dropped and logged.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut graph = DiGraph::with_capacity(tasks.len(), 0);
        let mut index = HashMap::with_capacity(tasks.len());

        for task in tasks {
            let idx = graph.add_node(TaskNode {
                id: task.id.clone(),
                status: task.status,
            });
            index.insert(task.id.clone(), idx);
        }

        for task in tasks {
            let from = index[&task.id];
            for dep in &task.depends_on {
                match index.get(dep) {
                    Some(&to) => {
                        graph.add_edge(from, to, ());
                    }
                    None => {
                        warn!(task = %task.id, dep = %dep, "dependency not in snapshot");
                    }
                }
            }
        }

        Self { graph, index }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.index.get(id).map(|&i| self.graph[i].status)
    }

    /// Check that giving `task_id` exactly the `proposed` dependencies keeps
    /// the graph acyclic.
    ///
    /// `task_id` may be a task that does not exist yet. A self-reference is
    /// rejected before any traversal. The traversal is an explicit-stack DFS
    /// with `visited` and `on_stack` sets, so depth is bounded only by memory.
    pub fn validate_no_cycle(&self, task_id: &str, proposed: &[TaskId]) -> Result<()> {
        if proposed.iter().any(|d| d == task_id) {
            return Err(PhaseflowError::CircularDependency {
                task: task_id.to_string(),
                path: vec![task_id.to_string(), task_id.to_string()],
            });
        }

        let mut roots = Vec::with_capacity(proposed.len());
        for dep in proposed {
            match self.index.get(dep) {
                Some(&i) => roots.push(i),
                None => return Err(PhaseflowError::UnknownTask(dep.clone())),
            }
        }

        let origin = self.index.get(task_id).copied();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut on_stack: HashSet<NodeIndex> = HashSet::new();

        for &root in &roots {
            if !visited.insert(root) {
                continue;
            }
            on_stack.insert(root);
            let mut stack = vec![Frame {
                node: root,
                successors: self.successors(root, origin, &roots),
                next: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                if frame.next >= frame.successors.len() {
                    on_stack.remove(&frame.node);
                    stack.pop();
                    continue;
                }
                let next = frame.successors[frame.next];
                frame.next += 1;

                if Some(next) == origin {
                    let mut path = vec![task_id.to_string()];
                    path.extend(stack.iter().map(|f| self.graph[f.node].id.clone()));
                    path.push(task_id.to_string());
                    debug!(task = %task_id, ?path, "proposed dependencies close a cycle");
                    return Err(PhaseflowError::CircularDependency {
                        task: task_id.to_string(),
                        path,
                    });
                }

                if on_stack.contains(&next) {
                    // Cycle already present among existing tasks.
                    let from = stack.iter().position(|f| f.node == next).unwrap_or(0);
                    let mut path: Vec<String> = stack[from..]
                        .iter()
                        .map(|f| self.graph[f.node].id.clone())
                        .collect();
                    path.push(self.graph[next].id.clone());
                    warn!(task = %task_id, ?path, "existing task graph contains a cycle");
                    return Err(PhaseflowError::CircularDependency {
                        task: task_id.to_string(),
                        path,
                    });
                }

                if visited.insert(next) {
                    on_stack.insert(next);
                    stack.push(Frame {
                        node: next,
                        successors: self.successors(next, origin, &roots),
                        next: 0,
                    });
                }
            }
        }

        Ok(())
    }

    /// Outgoing edges of `node`, with the task under validation using its
    /// proposed dependency list instead of the stored one.
    fn successors(
        &self,
        node: NodeIndex,
        origin: Option<NodeIndex>,
        proposed: &[NodeIndex],
    ) -> Vec<NodeIndex> {
        if Some(node) == origin {
            return proposed.to_vec();
        }
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect()
    }

    /// Dependencies of `id` that are not `Done`, in stored order.
    pub fn pending_dependencies(&self, id: &str) -> Result<Vec<TaskId>> {
        let &idx = self
            .index
            .get(id)
            .ok_or_else(|| PhaseflowError::UnknownTask(id.to_string()))?;
        let mut pending: Vec<TaskId> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter(|&n| self.graph[n].status != TaskStatus::Done)
            .map(|n| self.graph[n].id.clone())
            .collect();
        pending.sort();
        Ok(pending)
    }

    /// Like [`pending_dependencies`](Self::pending_dependencies) but for an
    /// arbitrary dependency list (e.g. of a task being created). Unknown ids
    /// count as pending.
    pub fn pending_among(&self, deps: &[TaskId]) -> Vec<TaskId> {
        deps.iter()
            .filter(|d| self.status_of(d) != Some(TaskStatus::Done))
            .cloned()
            .collect()
    }

    /// True iff every dependency of `id` is `Done` (vacuously true).
    pub fn can_start(&self, id: &str) -> Result<bool> {
        Ok(self.pending_dependencies(id)?.is_empty())
    }

    /// Task ids ordered so that every task comes after its dependencies.
    pub fn topological_order(&self) -> Result<Vec<TaskId>> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .rev()
                .map(|i| self.graph[i].id.clone())
                .collect()),
            Err(cycle) => {
                let id = self.graph[cycle.node_id()].id.clone();
                Err(PhaseflowError::CircularDependency {
                    task: id.clone(),
                    path: vec![id],
                })
            }
        }
    }
}
