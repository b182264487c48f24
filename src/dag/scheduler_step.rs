// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use crate::engine::StreamItem;
use crate::types::TaskName;

/// Structured result of handling a single completion.
///
/// The reactor only needs `streamed`; the rest is useful for tests that
/// drive the scheduler by hand and make assertions about what changed.
#[derive(Debug, Clone)]
pub struct SchedulerStep<V> {
    /// Output to hand to the caller, for streaming tasks.
    pub streamed: Option<StreamItem<V>>,
    /// Tasks that became ready as a result of this step.
    pub newly_ready: Vec<TaskName>,
    /// Tasks newly marked failed in this step.
    pub newly_failed: Vec<TaskName>,
    /// Task whose result was thrown away because the run is aborting.
    pub discarded: Option<TaskName>,
    /// Whether nothing is running and nothing else will be dispatched.
    pub run_finished: bool,
}

impl<V> SchedulerStep<V> {
    pub(crate) fn empty() -> Self {
        Self {
            streamed: None,
            newly_ready: Vec::new(),
            newly_failed: Vec::new(),
            discarded: None,
            run_finished: false,
        }
    }
}
