// src/task/state.rs

/// Lifecycle of a task within a single run.
///
/// Transitions are monotonic:
/// `Waiting -> Ready -> Running -> {Completed, Failed, Abandoned}`.
/// Only `Ready -> Running` dispatches work, so a task runs at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Some binding source has not completed yet.
    #[default]
    Waiting,
    /// All dependencies satisfied; queued for a worker slot.
    Ready,
    /// Dispatched to a worker.
    Running,
    /// Work returned and the output is recorded.
    Completed,
    /// Work raised, or its inputs could not be resolved.
    Failed,
    /// Work finished after the run was aborted; the result was discarded.
    Abandoned,
}

impl RunState {
    /// Whether the task has been claimed for dispatch.
    pub fn is_started(self) -> bool {
        matches!(
            self,
            RunState::Running | RunState::Completed | RunState::Failed | RunState::Abandoned
        )
    }

    pub fn is_completed(self) -> bool {
        self == RunState::Completed
    }

    pub fn is_failed(self) -> bool {
        self == RunState::Failed
    }

    /// Terminal states never change again during the run.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Failed | RunState::Abandoned
        )
    }
}
