// src/dag/work_item.rs

//! Description of a task the scheduler wants a worker to run now.

use std::fmt;

use crate::task::{PendingInputs, PostprocessFn, WorkFn};
use crate::types::{TaskId, TaskName, TaskValue};

/// A claimed task with its source outputs captured.
///
/// Everything a worker needs travels with the item, so workers never touch
/// the graph. Binding transforms, the work function and postprocess all run
/// on the worker, in that order.
pub struct WorkItem<V> {
    pub id: TaskId,
    pub name: TaskName,
    pub work: WorkFn<V>,
    pub inputs: PendingInputs<V>,
    pub postprocess: Option<PostprocessFn<V>>,
}

impl<V: TaskValue> fmt::Debug for WorkItem<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("args", &self.inputs.positional_len())
            .field("kwargs", &self.inputs.names().collect::<Vec<_>>())
            .field("postprocess", &self.postprocess.is_some())
            .finish()
    }
}
