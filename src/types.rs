// src/types.rs

//! Small shared types used across the task model, scheduler and engine.

use std::fmt;

/// Canonical task name type.
pub type TaskName = String;

/// Bound for values flowing between tasks.
///
/// Outputs are cloned when handed to several dependents or streamed to the
/// caller, and cross thread boundaries on their way back from workers.
pub trait TaskValue: Clone + Send + Sync + 'static {}

impl<T> TaskValue for T where T: Clone + Send + Sync + 'static {}

/// Position of a task inside a [`TaskGraph`](crate::dag::TaskGraph).
///
/// Ids follow declaration order, so iterating ids in ascending order visits
/// tasks in the order the caller supplied them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
