// src/engine/mod.rs

//! Execution engine for task graphs.
//!
//! The pure scheduling state machine lives in [`crate::dag::scheduler`]; this
//! module is the async shell around it:
//! - [`runtime`] holds the reactor: a single task that owns the scheduler,
//!   hands ready work to an [`ExecutorBackend`](crate::exec::ExecutorBackend)
//!   and reacts to completions arriving on a channel.
//! - [`run`] holds [`GraphRun`], the lazily started output sequence, and the
//!   `run_graph` entry points.

use crate::config::ConfigFile;
use crate::types::{TaskId, TaskName};

/// Outcome of one task's work, as reported by a worker.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome<V> {
    Success(V),
    /// Work returned an error or panicked.
    Failed(String),
}

/// Completion event flowing from workers back to the reactor.
#[derive(Debug, Clone)]
pub struct Completion<V> {
    pub id: TaskId,
    pub task: TaskName,
    pub outcome: TaskOutcome<V>,
}

/// One element of the output sequence: a streaming task's output, tagged
/// with the task's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamItem<V> {
    pub value: V,
    pub task: TaskName,
}

impl<V> StreamItem<V> {
    pub fn into_pair(self) -> (V, TaskName) {
        (self.value, self.task)
    }
}

/// Options used when starting a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Upper bound on task bodies executing at the same time.
    pub max_workers: usize,
    /// Capacity of the output channel between the reactor and the consumer.
    pub stream_buffer: usize,
}

impl RunOptions {
    pub fn with_max_workers(max_workers: usize) -> Self {
        Self {
            max_workers,
            ..Self::default()
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_workers: 10,
            stream_buffer: 64,
        }
    }
}

impl From<&ConfigFile> for RunOptions {
    fn from(cfg: &ConfigFile) -> Self {
        Self {
            max_workers: cfg.executor.max_workers,
            stream_buffer: cfg.executor.stream_buffer,
        }
    }
}

pub mod run;
pub mod runtime;

pub use run::{run_graph, run_graph_with, GraphRun};
pub use runtime::Reactor;
