// src/dag/scheduler.rs

use std::collections::{HashSet, VecDeque};
use std::fmt;

use tracing::{debug, info, warn};

use crate::dag::graph::TaskGraph;
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::work_item::WorkItem;
use crate::engine::{Completion, StreamItem, TaskOutcome};
use crate::errors::TaskdagError;
use crate::task::RunState;
use crate::types::{TaskId, TaskName, TaskValue};

/// Why the run stopped dispatching new work.
#[derive(Debug, Clone)]
enum Abort {
    /// First task whose work failed.
    TaskFailed { task: TaskId, message: String },
    /// A task was marked ready before its binding sources completed.
    Unresolved { task: TaskId, source_task: TaskName },
    /// The consumer of the output sequence went away.
    Cancelled,
}

/// Scheduler holds the task graph plus all mutable per-run state.
///
/// It is synchronous and owns no channels or threads: the reactor feeds it
/// completions and forwards whatever it dispatches. It is responsible for:
/// - tracking which tasks are ready (dependencies satisfied)
/// - claiming ready tasks at most once, within the worker budget
/// - recording outputs and marking dependents ready
/// - aborting on the first failure and describing what was left unrun
pub struct Scheduler<V> {
    graph: TaskGraph<V>,
    /// Ready tasks waiting for a worker slot, in the order they became ready.
    ready: VecDeque<TaskId>,
    running: usize,
    max_workers: usize,
    abort: Option<Abort>,
}

impl<V: TaskValue> Scheduler<V> {
    /// Take ownership of a validated graph. `max_workers` is at least 1.
    pub fn new(graph: TaskGraph<V>, max_workers: usize) -> Self {
        let mut scheduler = Self {
            graph,
            ready: VecDeque::new(),
            running: 0,
            max_workers: max_workers.max(1),
            abort: None,
        };

        let entries: Vec<TaskId> = scheduler
            .graph
            .ids()
            .filter(|id| scheduler.graph.is_entry(*id))
            .collect();

        // A task marked ready whose sources have not run can never resolve
        // its inputs; fail before anything is dispatched.
        if let Some((id, source_task)) = entries
            .iter()
            .find_map(|id| scheduler.pending_source(*id).map(|source| (*id, source)))
        {
            warn!(task = %scheduler.graph.name_of(id), source = %source_task, "task marked ready before its sources completed; aborting run");
            scheduler.graph.task_mut(id).set_state(RunState::Failed);
            scheduler.abort = Some(Abort::Unresolved { task: id, source_task });
            return scheduler;
        }

        for id in entries {
            scheduler.mark_ready(id);
        }

        scheduler
    }

    pub fn graph(&self) -> &TaskGraph<V> {
        &self.graph
    }

    /// Give the graph back, with per-task state and outputs as left by the run.
    pub fn into_graph(self) -> TaskGraph<V> {
        self.graph
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Number of tasks dispatched and not yet reported back.
    pub fn running(&self) -> usize {
        self.running
    }

    /// Number of ready tasks waiting for a worker slot.
    pub fn queued(&self) -> usize {
        self.ready.len()
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.is_some()
    }

    /// Read-only view of the given task's run state.
    pub fn run_state_of(&self, task: &str) -> Option<RunState> {
        self.graph.get(task).map(|t| t.state())
    }

    /// Nothing is running and nothing else will be dispatched.
    ///
    /// With an acyclic graph this means every task completed, unless the run
    /// was aborted; see [`Scheduler::terminal_error`].
    pub fn is_finished(&self) -> bool {
        self.running == 0 && (self.abort.is_some() || self.ready.is_empty())
    }

    /// Stop dispatching. Running work is still accounted for, but its
    /// results are discarded.
    pub fn cancel(&mut self) {
        if self.abort.is_none() {
            warn!(running = self.running, "run cancelled; no further tasks will start");
            self.abort = Some(Abort::Cancelled);
        }
    }

    /// Claim ready tasks up to the free worker slots and capture their inputs.
    ///
    /// Each returned item is `Running` and counts against `max_workers` until
    /// its completion is handed to [`Scheduler::step_completion`].
    pub fn dispatch_ready(&mut self) -> Vec<WorkItem<V>> {
        let mut items = Vec::new();

        while self.abort.is_none() && self.running < self.max_workers {
            let Some(id) = self.ready.pop_front() else {
                break;
            };

            // Claim: only Ready -> Running dispatches work.
            if self.graph.task(id).state() != RunState::Ready {
                continue;
            }

            match self.graph.capture_inputs(id) {
                Ok(inputs) => {
                    let task = self.graph.task_mut(id);
                    task.set_state(RunState::Running);
                    self.running += 1;
                    debug!(task = %task.name(), running = self.running, "dependencies satisfied; dispatching");
                    items.push(WorkItem {
                        id,
                        name: task.name().to_string(),
                        work: task.work(),
                        inputs,
                        postprocess: task.postprocess_fn(),
                    });
                }
                Err(err) => {
                    let task = self.graph.task_mut(id);
                    task.set_state(RunState::Failed);
                    warn!(task = %task.name(), error = %err, "inputs could not be resolved; aborting run");
                    self.abort = Some(match err {
                        TaskdagError::UnresolvedBinding { source_task } => {
                            Abort::Unresolved { task: id, source_task }
                        }
                        other => Abort::TaskFailed {
                            task: id,
                            message: other.to_string(),
                        },
                    });
                }
            }
        }

        items
    }

    /// Record the outcome of a dispatched task.
    pub fn step_completion(&mut self, completion: Completion<V>) -> SchedulerStep<V> {
        let Completion { id, task: name, outcome } = completion;
        let mut step = SchedulerStep::empty();

        if id.index() >= self.graph.len() || self.graph.task(id).state() != RunState::Running {
            warn!(task = %name, "completion for a task that is not running; ignoring");
            step.run_finished = self.is_finished();
            return step;
        }
        self.running -= 1;

        match outcome {
            TaskOutcome::Success(_) if self.abort.is_some() => {
                self.graph.task_mut(id).set_state(RunState::Abandoned);
                warn!(task = %name, "run is aborting; discarding result");
                step.discarded = Some(name);
            }
            TaskOutcome::Success(value) => {
                let task = self.graph.task_mut(id);
                task.record_output(value);
                debug!(task = %name, "task completed");

                if task.streams() {
                    if let Ok(value) = task.output() {
                        step.streamed = Some(StreamItem {
                            value: value.clone(),
                            task: name,
                        });
                    }
                }

                for dependent in self.graph.dependents_of(id).to_vec() {
                    if self.graph.task(dependent).state() == RunState::Waiting
                        && self.graph.deps_completed(dependent)
                    {
                        self.mark_ready(dependent);
                        step.newly_ready.push(self.graph.name_of(dependent).to_string());
                    }
                }
            }
            TaskOutcome::Failed(message) => {
                self.graph.task_mut(id).set_state(RunState::Failed);
                step.newly_failed.push(name.clone());
                if self.abort.is_none() {
                    info!(task = %name, error = %message, "task failed; aborting run");
                    self.abort = Some(Abort::TaskFailed { task: id, message });
                } else {
                    warn!(task = %name, error = %message, "task failed while run was aborting");
                }
            }
        }

        step.run_finished = self.is_finished();
        step
    }

    /// Mark the given dispatched tasks as failed without a completion, e.g.
    /// when the executor could not accept them.
    pub fn fail_dispatched(&mut self, ids: &[TaskId], message: &str) {
        for id in ids {
            if self.graph.task(*id).state() != RunState::Running {
                continue;
            }
            self.running -= 1;
            self.graph.task_mut(*id).set_state(RunState::Failed);
            if self.abort.is_none() {
                self.abort = Some(Abort::TaskFailed {
                    task: *id,
                    message: message.to_string(),
                });
            }
        }
    }

    /// Error to surface once the run is finished, if it did not complete
    /// normally. `None` for a clean run or a cancelled one.
    pub fn terminal_error(&self) -> Option<TaskdagError> {
        match &self.abort {
            Some(Abort::TaskFailed { task, message }) => {
                let (unreachable, skipped) = self.unstarted_tasks();
                Some(TaskdagError::TaskFailed {
                    task: self.graph.name_of(*task).to_string(),
                    message: message.clone(),
                    unreachable,
                    skipped,
                })
            }
            Some(Abort::Unresolved { task, source_task }) => {
                debug!(task = %self.graph.name_of(*task), source = %source_task, "run ended on unresolved binding");
                Some(TaskdagError::UnresolvedBinding {
                    source_task: source_task.clone(),
                })
            }
            Some(Abort::Cancelled) => None,
            None => {
                let pending: Vec<TaskName> = self
                    .graph
                    .tasks()
                    .filter(|t| !t.state().is_terminal())
                    .map(|t| t.name().to_string())
                    .collect();
                if pending.is_empty() {
                    None
                } else {
                    Some(TaskdagError::Stalled { pending })
                }
            }
        }
    }

    /// First binding source of `id` that has not completed yet.
    fn pending_source(&self, id: TaskId) -> Option<TaskName> {
        self.graph
            .dependencies_of(id)
            .iter()
            .find(|dep| !self.graph.task(**dep).is_completed())
            .map(|dep| self.graph.name_of(*dep).to_string())
    }

    fn mark_ready(&mut self, id: TaskId) {
        self.graph.task_mut(id).set_state(RunState::Ready);
        self.ready.push_back(id);
        debug!(task = %self.graph.name_of(id), "task ready");
    }

    /// Never-started tasks, split into those downstream of a failed task and
    /// the rest. Both in declaration order.
    fn unstarted_tasks(&self) -> (Vec<TaskName>, Vec<TaskName>) {
        let mut downstream: HashSet<TaskId> = HashSet::new();
        let mut stack: Vec<TaskId> = self
            .graph
            .ids()
            .filter(|id| self.graph.task(*id).is_failed())
            .collect();

        while let Some(id) = stack.pop() {
            for dependent in self.graph.dependents_of(id) {
                if downstream.insert(*dependent) {
                    stack.push(*dependent);
                }
            }
        }

        let mut unreachable = Vec::new();
        let mut skipped = Vec::new();
        for id in self.graph.ids() {
            if self.graph.task(id).is_started() {
                continue;
            }
            let name = self.graph.name_of(id).to_string();
            if downstream.contains(&id) {
                unreachable.push(name);
            } else {
                skipped.push(name);
            }
        }

        (unreachable, skipped)
    }
}

impl<V: TaskValue> fmt::Debug for Scheduler<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.graph.len())
            .field("ready", &self.ready)
            .field("running", &self.running)
            .field("max_workers", &self.max_workers)
            .field("abort", &self.abort)
            .finish()
    }
}
