// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::dag::{Scheduler, TaskGraph};
use crate::engine::{Completion, StreamItem};
use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::types::TaskValue;

/// Drives the scheduler in response to completions, and delegates actual
/// work execution to an `ExecutorBackend`.
///
/// All task state is owned by the scheduler inside this single task; workers
/// only ever see captured inputs and send back a [`Completion`]. The only
/// await points are dispatching, waiting for the next completion, and
/// handing an output to the consumer.
pub struct Reactor<V: TaskValue> {
    scheduler: Scheduler<V>,
    backend: Box<dyn ExecutorBackend<V>>,
    completions_tx: mpsc::Sender<Completion<V>>,
    completions_rx: mpsc::Receiver<Completion<V>>,
    output_tx: mpsc::Sender<Result<StreamItem<V>>>,
}

impl<V: TaskValue> fmt::Debug for Reactor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactor")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<V: TaskValue> Reactor<V> {
    pub fn new(
        scheduler: Scheduler<V>,
        backend: Box<dyn ExecutorBackend<V>>,
        output_tx: mpsc::Sender<Result<StreamItem<V>>>,
    ) -> Self {
        // At most `max_workers` completions are ever outstanding, so workers
        // never block on a full channel.
        let (completions_tx, completions_rx) = mpsc::channel(scheduler.max_workers());
        Self {
            scheduler,
            backend,
            completions_tx,
            completions_rx,
            output_tx,
        }
    }

    /// Main loop: dispatch, wait for a completion, stream, repeat.
    ///
    /// Returns the graph once nothing is running and nothing else can be
    /// dispatched. A terminal error, if any, is sent as the last element of
    /// the output sequence.
    pub async fn run(mut self) -> TaskGraph<V> {
        info!(
            tasks = self.scheduler.graph().len(),
            max_workers = self.scheduler.max_workers(),
            "graph run started"
        );

        loop {
            if self.output_tx.is_closed() && !self.scheduler.is_aborted() {
                warn!("output sequence dropped by consumer; cancelling run");
                self.scheduler.cancel();
            }

            self.dispatch().await;

            if self.scheduler.is_finished() {
                break;
            }

            let completion = match self.completions_rx.recv().await {
                Some(c) => c,
                None => {
                    // We hold a sender ourselves, so this cannot happen.
                    error!("completion channel closed while tasks were running");
                    break;
                }
            };
            debug!(task = %completion.task, "reactor received completion");

            let step = self.scheduler.step_completion(completion);

            if let Some(item) = step.streamed {
                if self.output_tx.send(Ok(item)).await.is_err() {
                    warn!("output sequence dropped by consumer; cancelling run");
                    self.scheduler.cancel();
                }
            }
        }

        match self.scheduler.terminal_error() {
            Some(err) => {
                warn!(error = %err, "graph run ended with an error");
                let _ = self.output_tx.send(Err(err)).await;
            }
            None => info!("graph run finished"),
        }

        self.scheduler.into_graph()
    }

    async fn dispatch(&mut self) {
        let items = self.scheduler.dispatch_ready();
        if items.is_empty() {
            return;
        }

        let ids: Vec<_> = items.iter().map(|item| item.id).collect();
        let names: Vec<_> = items.iter().map(|item| item.name.clone()).collect();
        debug!(?names, running = self.scheduler.running(), "dispatching ready tasks");

        if let Err(err) = self
            .backend
            .dispatch(items, self.completions_tx.clone())
            .await
        {
            error!(error = %err, ?names, "executor rejected tasks");
            self.scheduler.fail_dispatched(&ids, &err.to_string());
        }
    }
}
