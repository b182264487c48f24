// src/dag/summary.rs

//! Read-only diagnostic view of a task graph.
//!
//! Reports roots, streaming tasks, sinks, the dependency map and its
//! reverse, and every maximal path from a root to a sink. Nothing here
//! touches task state, and the scheduler never calls into it.

use std::fmt;

use crate::dag::TaskGraph;
use crate::types::{TaskId, TaskName, TaskValue};

/// Per-task line of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub name: TaskName,
    pub root: bool,
    pub streams: bool,
    pub depends_on: Vec<TaskName>,
    pub required_by: Vec<TaskName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSummary {
    /// All tasks, declaration order.
    pub tasks: Vec<TaskSummary>,
    /// Tasks runnable at start.
    pub roots: Vec<TaskName>,
    /// Tasks whose output is streamed to the caller.
    pub streaming: Vec<TaskName>,
    /// Tasks nothing depends on.
    pub sinks: Vec<TaskName>,
    /// Maximal root-to-sink paths, following dependents.
    pub paths: Vec<Vec<TaskName>>,
}

impl GraphSummary {
    pub fn from_graph<V: TaskValue>(graph: &TaskGraph<V>) -> Self {
        let names = |ids: &[TaskId]| -> Vec<TaskName> {
            ids.iter().map(|id| graph.name_of(*id).to_string()).collect()
        };

        let tasks = graph
            .ids()
            .map(|id| TaskSummary {
                name: graph.name_of(id).to_string(),
                root: graph.is_entry(id),
                streams: graph.task(id).streams(),
                depends_on: names(graph.dependencies_of(id)),
                required_by: names(graph.dependents_of(id)),
            })
            .collect::<Vec<_>>();

        let roots: Vec<TaskId> = graph.ids().filter(|id| graph.is_entry(*id)).collect();

        let paths = roots
            .iter()
            .flat_map(|root| trace_paths(graph, *root))
            .map(|path| names(path.as_slice()))
            .collect();

        Self {
            roots: names(roots.as_slice()),
            streaming: tasks.iter().filter(|t| t.streams).map(|t| t.name.clone()).collect(),
            sinks: tasks
                .iter()
                .filter(|t| t.required_by.is_empty())
                .map(|t| t.name.clone())
                .collect(),
            tasks,
            paths,
        }
    }
}

/// All maximal paths starting at `root`, depth first.
///
/// A node may appear on several paths, but never twice on the same one; a
/// branch that would revisit a node already on its path is dropped.
fn trace_paths<V: TaskValue>(graph: &TaskGraph<V>, root: TaskId) -> Vec<Vec<TaskId>> {
    let mut paths = Vec::new();
    let mut stack: Vec<(TaskId, Vec<TaskId>)> = vec![(root, Vec::new())];

    while let Some((node, mut path)) = stack.pop() {
        if path.contains(&node) {
            continue;
        }
        path.push(node);

        let dependents = graph.dependents_of(node);
        if dependents.is_empty() {
            paths.push(path);
            continue;
        }
        // Reverse so the first dependent is explored first.
        for dependent in dependents.iter().rev() {
            stack.push((*dependent, path.clone()));
        }
    }

    paths
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== TASK DEPENDENCY GRAPH SUMMARY ===")?;
        writeln!(f)?;

        writeln!(f, "Task Structure:")?;
        for task in &self.tasks {
            let mut markers = Vec::new();
            if task.root {
                markers.push("ROOT");
            }
            if task.streams {
                markers.push("YIELDS");
            }
            if markers.is_empty() {
                writeln!(f, "  {}", task.name)?;
            } else {
                writeln!(f, "  {} [{}]", task.name, markers.join(", "))?;
            }
            if !task.depends_on.is_empty() {
                writeln!(f, "    Depends on: {}", task.depends_on.join(", "))?;
            }
            if !task.required_by.is_empty() {
                writeln!(f, "    Required by: {}", task.required_by.join(", "))?;
            }
        }

        for (title, names) in [
            ("Starting Tasks", &self.roots),
            ("Yielding Tasks", &self.streaming),
            ("Sink Tasks", &self.sinks),
        ] {
            writeln!(f)?;
            writeln!(f, "{title}:")?;
            for name in names {
                writeln!(f, "  {name}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Execution Paths:")?;
        for (i, path) in self.paths.iter().enumerate() {
            writeln!(f, "  Path {}: {}", i + 1, path.join(" → "))?;
        }

        writeln!(f)?;
        write!(f, "=== END OF SUMMARY ===")
    }
}
