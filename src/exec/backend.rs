// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The reactor talks to an `ExecutorBackend` instead of spawning threads
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation here.
//!
//! The reactor never hands out more items than it has free worker slots, so
//! backends do not need their own concurrency limit.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::debug;

use crate::dag::WorkItem;
use crate::engine::Completion;
use crate::errors::Result;
use crate::exec::worker::run_work;
use crate::types::TaskValue;

/// Trait abstracting how dispatched work is executed.
pub trait ExecutorBackend<V: TaskValue>: Send {
    /// Start the given items. Each must eventually produce exactly one
    /// [`Completion`] on `completions`.
    ///
    /// Returning `Err` means none of `items` was started; the reactor then
    /// fails them itself.
    fn dispatch(
        &mut self,
        items: Vec<WorkItem<V>>,
        completions: mpsc::Sender<Completion<V>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: one blocking-pool thread per running work item.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPoolBackend;

impl ThreadPoolBackend {
    pub fn new() -> Self {
        Self
    }
}

impl<V: TaskValue> ExecutorBackend<V> for ThreadPoolBackend {
    fn dispatch(
        &mut self,
        items: Vec<WorkItem<V>>,
        completions: mpsc::Sender<Completion<V>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for item in items {
                let tx = completions.clone();
                tokio::task::spawn_blocking(move || {
                    let completion = run_work(item);
                    let task = completion.task.clone();
                    if tx.blocking_send(completion).is_err() {
                        debug!(task = %task, "reactor gone; dropping completion");
                    }
                });
            }
            Ok(())
        })
    }
}
