// src/engine/run.rs

use std::fmt;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::dag::{check_acyclic, Scheduler, TaskGraph};
use crate::engine::{Reactor, RunOptions, StreamItem};
use crate::errors::{Result, TaskdagError};
use crate::exec::{ExecutorBackend, ThreadPoolBackend};
use crate::task::Task;
use crate::types::TaskValue;

/// Build, validate and prepare a run of `tasks` on the default thread-pool
/// backend.
///
/// Fails with [`TaskdagError::GraphCycle`] before anything executes if the
/// tasks contain a dependency cycle. Execution starts on the first call to
/// [`GraphRun::next`].
pub fn run_graph<V: TaskValue>(
    tasks: impl IntoIterator<Item = Task<V>>,
    max_workers: usize,
) -> Result<GraphRun<V>> {
    let graph = TaskGraph::new(tasks)?;
    run_graph_with(
        graph,
        RunOptions::with_max_workers(max_workers),
        ThreadPoolBackend::new(),
    )
}

/// Like [`run_graph`], with explicit options and executor backend.
pub fn run_graph_with<V, B>(graph: TaskGraph<V>, options: RunOptions, backend: B) -> Result<GraphRun<V>>
where
    V: TaskValue,
    B: ExecutorBackend<V> + 'static,
{
    check_acyclic(&graph)?;
    info!(tasks = graph.len(), "no circular dependency detected");

    Ok(GraphRun {
        phase: RunPhase::Pending {
            scheduler: Scheduler::new(graph, options.max_workers),
            backend: Box::new(backend),
        },
        stream_buffer: options.stream_buffer.max(1),
    })
}

enum RunPhase<V: TaskValue> {
    /// Validated, nothing executed yet.
    Pending {
        scheduler: Scheduler<V>,
        backend: Box<dyn ExecutorBackend<V>>,
    },
    Running {
        items: mpsc::Receiver<Result<StreamItem<V>>>,
        reactor: JoinHandle<TaskGraph<V>>,
    },
    /// The reactor has been joined. `graph` is `None` if it panicked or was
    /// already taken.
    Finished { graph: Option<TaskGraph<V>> },
}

/// Lazily started sequence of `(output, task)` pairs for streaming tasks, in
/// completion order.
///
/// The sequence ends once every task has completed and the reactor has been
/// joined. If the run fails, the last element is the terminal error.
/// Dropping the sequence early cancels the run: no further tasks start and
/// results of running ones are discarded.
pub struct GraphRun<V: TaskValue> {
    phase: RunPhase<V>,
    stream_buffer: usize,
}

impl<V: TaskValue> GraphRun<V> {
    /// Next streamed output, starting execution on first call.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn next(&mut self) -> Option<Result<StreamItem<V>>> {
        self.start();

        let item = match &mut self.phase {
            RunPhase::Running { items, .. } => items.recv().await,
            _ => return None,
        };

        match item {
            Some(item) => Some(item),
            None => self.join().await.err().map(Err),
        }
    }

    /// Drain the whole sequence, stopping at the first error.
    pub async fn collect(mut self) -> Result<Vec<StreamItem<V>>> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await {
            out.push(item?);
        }
        Ok(out)
    }

    /// Run to the end, discarding streamed outputs and errors, and return
    /// the graph with its final per-task state.
    pub async fn into_graph(mut self) -> Result<TaskGraph<V>> {
        while self.next().await.is_some() {}

        match std::mem::replace(&mut self.phase, RunPhase::Finished { graph: None }) {
            RunPhase::Finished { graph: Some(graph) } => Ok(graph),
            _ => Err(TaskdagError::Other(anyhow!("graph run did not return its task graph"))),
        }
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.phase, RunPhase::Pending { .. })
    }

    fn start(&mut self) {
        let phase = std::mem::replace(&mut self.phase, RunPhase::Finished { graph: None });
        self.phase = match phase {
            RunPhase::Pending { scheduler, backend } => {
                let (output_tx, items) = mpsc::channel(self.stream_buffer);
                let reactor = Reactor::new(scheduler, backend, output_tx);
                RunPhase::Running {
                    items,
                    reactor: tokio::spawn(reactor.run()),
                }
            }
            other => other,
        };
    }

    /// Wait for the reactor to return the graph.
    async fn join(&mut self) -> Result<()> {
        let phase = std::mem::replace(&mut self.phase, RunPhase::Finished { graph: None });
        match phase {
            RunPhase::Running { reactor, .. } => match reactor.await {
                Ok(graph) => {
                    self.phase = RunPhase::Finished { graph: Some(graph) };
                    Ok(())
                }
                Err(err) => Err(TaskdagError::Other(anyhow!("graph reactor failed: {err}"))),
            },
            other => {
                self.phase = other;
                Ok(())
            }
        }
    }
}

impl<V: TaskValue> fmt::Debug for GraphRun<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match &self.phase {
            RunPhase::Pending { .. } => "pending",
            RunPhase::Running { .. } => "running",
            RunPhase::Finished { .. } => "finished",
        };
        f.debug_struct("GraphRun")
            .field("phase", &phase)
            .field("stream_buffer", &self.stream_buffer)
            .finish()
    }
}
