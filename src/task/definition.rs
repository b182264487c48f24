// src/task/definition.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{Result, TaskdagError};
use crate::task::{Binding, PostprocessFn, RunState, TaskInputs, WorkFn};
use crate::types::{TaskName, TaskValue};

/// A unit of work plus the bindings that feed it.
///
/// Constructing a task never runs its work. Once the task is part of a run,
/// its state and output are mutated only by the scheduler.
pub struct Task<V> {
    name: TaskName,
    work: WorkFn<V>,
    args: Vec<Binding<V>>,
    kwargs: BTreeMap<String, Binding<V>>,
    postprocess: Option<PostprocessFn<V>>,
    initially_ready: bool,
    streams: bool,

    state: RunState,
    output: Option<V>,
}

impl<V: TaskValue> Task<V> {
    pub fn new<F>(name: impl Into<TaskName>, work: F) -> Self
    where
        F: Fn(TaskInputs<V>) -> anyhow::Result<V> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            work: Arc::new(work),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
            postprocess: None,
            initially_ready: false,
            streams: false,
            state: RunState::Waiting,
            output: None,
        }
    }

    /// A task without a name; the graph names it `task_<index>`.
    pub fn unnamed<F>(work: F) -> Self
    where
        F: Fn(TaskInputs<V>) -> anyhow::Result<V> + Send + Sync + 'static,
    {
        Self::new(String::new(), work)
    }

    /// Append a positional binding.
    pub fn arg(mut self, binding: Binding<V>) -> Self {
        self.args.push(binding);
        self
    }

    pub fn args(mut self, bindings: impl IntoIterator<Item = Binding<V>>) -> Self {
        self.args.extend(bindings);
        self
    }

    /// Add (or replace) a named binding.
    pub fn kwarg(mut self, name: impl Into<String>, binding: Binding<V>) -> Self {
        self.kwargs.insert(name.into(), binding);
        self
    }

    pub fn postprocess<F>(mut self, postprocess: F) -> Self
    where
        F: Fn(V) -> V + Send + Sync + 'static,
    {
        self.postprocess = Some(Arc::new(postprocess));
        self
    }

    /// Mark the task as runnable before anything else has completed.
    pub fn ready(mut self) -> Self {
        self.initially_ready = true;
        self
    }

    /// Emit this task's output to the caller as soon as it completes.
    pub fn streaming(mut self) -> Self {
        self.streams = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positional_bindings(&self) -> &[Binding<V>] {
        &self.args
    }

    pub fn named_bindings(&self) -> &BTreeMap<String, Binding<V>> {
        &self.kwargs
    }

    /// All bindings: positional first, then named in key order.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding<V>> {
        self.args.iter().chain(self.kwargs.values())
    }

    pub fn is_initially_ready(&self) -> bool {
        self.initially_ready
    }

    pub fn streams(&self) -> bool {
        self.streams
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    /// The post-processed output. Only available once the task completed.
    pub fn output(&self) -> Result<&V> {
        match (&self.output, self.state) {
            (Some(value), RunState::Completed) => Ok(value),
            _ => Err(TaskdagError::NotCompleted {
                task: self.name.clone(),
            }),
        }
    }

    pub(crate) fn work(&self) -> WorkFn<V> {
        Arc::clone(&self.work)
    }

    pub(crate) fn set_name(&mut self, name: TaskName) {
        self.name = name;
    }

    pub(crate) fn set_state(&mut self, state: RunState) {
        self.state = state;
    }

    pub(crate) fn postprocess_fn(&self) -> Option<PostprocessFn<V>> {
        self.postprocess.clone()
    }

    /// Record the already post-processed output and mark the task completed.
    pub(crate) fn record_output(&mut self, value: V) {
        self.output = Some(value);
        self.state = RunState::Completed;
    }
}

impl<V> fmt::Debug for Task<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .field("initially_ready", &self.initially_ready)
            .field("streams", &self.streams)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn construction_does_not_run_work() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let task: Task<u32> = Task::new("t", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        })
        .ready()
        .streaming();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(task.is_initially_ready());
        assert!(task.streams());
        assert_eq!(task.state(), RunState::Waiting);
    }

    #[test]
    fn output_before_completion_is_an_error() {
        let task: Task<u32> = Task::new("early", |_| Ok(1));
        match task.output() {
            Err(TaskdagError::NotCompleted { task }) => assert_eq!(task, "early"),
            other => panic!("expected NotCompleted, got {other:?}"),
        }
    }

    #[test]
    fn recorded_output_is_cached() {
        let mut task: Task<String> = Task::new("t", |_| Ok(String::new()))
            .postprocess(|v| format!("{v}!"));
        assert!(task.postprocess_fn().is_some());

        task.record_output("done!".to_string());

        let first = task.output().unwrap();
        let second = task.output().unwrap();
        assert_eq!(first, "done!");
        assert!(std::ptr::eq(first, second));
        assert!(task.is_completed());
    }

    #[test]
    fn bindings_list_positional_before_named() {
        let task: Task<u32> = Task::new("t", |_| Ok(0))
            .kwarg("z", Binding::to("c"))
            .arg(Binding::to("a"))
            .kwarg("y", Binding::to("b"));

        let sources: Vec<&str> = task.bindings().map(Binding::source).collect();
        assert_eq!(sources, vec!["a", "b", "c"]);
    }
}
