// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::TaskName;

#[derive(Error, Debug)]
pub enum TaskdagError {
    /// The graph contains a dependency cycle. `cycle` lists each task once;
    /// every entry depends on the next, and the last depends on the first.
    #[error("cycle detected in task graph: {}", format_cycle(.cycle))]
    GraphCycle { cycle: Vec<TaskName> },

    #[error("binding resolved before its source task '{source_task}' completed")]
    UnresolvedBinding { source_task: TaskName },

    #[error("output of task '{task}' read before it completed")]
    NotCompleted { task: TaskName },

    #[error(
        "task '{task}' failed: {message} (unreachable: [{}], skipped: [{}])",
        .unreachable.join(", "),
        .skipped.join(", ")
    )]
    TaskFailed {
        task: TaskName,
        message: String,
        /// Tasks that transitively depend on a failed task and never started.
        unreachable: Vec<TaskName>,
        /// Other tasks that never started because the run was aborted.
        skipped: Vec<TaskName>,
    },

    #[error("no runnable tasks left but {} task(s) still pending: [{}]", .pending.len(), .pending.join(", "))]
    Stalled { pending: Vec<TaskName> },

    #[error("duplicate task name: {0}")]
    DuplicateTask(TaskName),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: TaskName, dependency: TaskName },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskdagError {
    /// Names of the tasks forming the cycle, if this is a cycle error.
    pub fn cycle(&self) -> Option<&[TaskName]> {
        match self {
            TaskdagError::GraphCycle { cycle } => Some(cycle),
            _ => None,
        }
    }
}

fn format_cycle(cycle: &[TaskName]) -> String {
    match cycle.first() {
        Some(first) => {
            let mut parts: Vec<&str> = cycle.iter().map(String::as_str).collect();
            parts.push(first);
            parts.join(" → ")
        }
        None => String::new(),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskdagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_closes_the_loop() {
        let err = TaskdagError::GraphCycle {
            cycle: vec!["task1".into(), "task2".into(), "task3".into()],
        };
        assert_eq!(
            err.to_string(),
            "cycle detected in task graph: task1 → task2 → task3 → task1"
        );
        assert_eq!(err.cycle().map(|c| c.len()), Some(3));
    }

    #[test]
    fn task_failure_lists_unreachable_tasks() {
        let err = TaskdagError::TaskFailed {
            task: "boom".into(),
            message: "exploded".into(),
            unreachable: vec!["after_boom".into()],
            skipped: Vec::new(),
        };
        let msg = err.to_string();
        assert!(msg.contains("boom"));
        assert!(msg.contains("unreachable: [after_boom]"));
    }
}
