// src/dag/cycle.rs

//! Cycle detection over the dependency relation (dependent -> dependency).
//!
//! Iterative depth-first search with an explicit frame stack, so deep chains
//! cannot overflow the call stack. Every task is used as a root in
//! declaration order, skipping tasks already fully explored, which makes the
//! reported cycle reproducible for a given graph.

use tracing::{debug, warn};

use crate::dag::TaskGraph;
use crate::errors::{Result, TaskdagError};
use crate::types::{TaskId, TaskValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Find one cycle, if any.
///
/// The returned ids are ordered so that each task depends on the next and
/// the last depends on the first.
pub fn find_cycle<V: TaskValue>(graph: &TaskGraph<V>) -> Option<Vec<TaskId>> {
    let mut marks = vec![Mark::Unvisited; graph.len()];
    // (task, index of the next dependency to explore). The stack is also the
    // current DFS path.
    let mut stack: Vec<(TaskId, usize)> = Vec::new();

    for root in graph.ids() {
        if marks[root.index()] != Mark::Unvisited {
            continue;
        }
        marks[root.index()] = Mark::OnPath;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            match graph.dependencies_of(node).get(next) {
                Some(&dep) => {
                    frame.1 += 1;
                    match marks[dep.index()] {
                        Mark::OnPath => {
                            let start = stack.iter().position(|(id, _)| *id == dep)?;
                            return Some(stack[start..].iter().map(|(id, _)| *id).collect());
                        }
                        Mark::Unvisited => {
                            marks[dep.index()] = Mark::OnPath;
                            stack.push((dep, 0));
                        }
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[node.index()] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }

    None
}

/// Validate that the graph is a DAG.
///
/// Returns [`TaskdagError::GraphCycle`] with the task names of the first
/// cycle found.
pub fn check_acyclic<V: TaskValue>(graph: &TaskGraph<V>) -> Result<()> {
    match find_cycle(graph) {
        Some(ids) => {
            let cycle: Vec<String> = ids
                .into_iter()
                .map(|id| graph.name_of(id).to_string())
                .collect();
            warn!(?cycle, "circular dependency detected");
            Err(TaskdagError::GraphCycle { cycle })
        }
        None => {
            debug!(tasks = graph.len(), "no circular dependency detected");
            Ok(())
        }
    }
}
