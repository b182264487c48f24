use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use taskdag::dag::WorkItem;
use taskdag::engine::Completion;
use taskdag::errors::Result;
use taskdag::exec::{run_work, ExecutorBackend};
use taskdag::types::TaskValue;

/// An executor backend that:
/// - records which tasks were dispatched, in order
/// - runs each work item immediately on the reactor's thread
///
/// This makes dispatch order deterministic, which the thread-pool backend
/// does not.
#[derive(Debug, Clone, Default)]
pub struct InlineBackend {
    dispatched: Arc<Mutex<Vec<String>>>,
}

impl InlineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of dispatched tasks so far. Shared between clones.
    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched.lock().unwrap().clone()
    }
}

impl<V: TaskValue> ExecutorBackend<V> for InlineBackend {
    fn dispatch(
        &mut self,
        items: Vec<WorkItem<V>>,
        completions: mpsc::Sender<Completion<V>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let dispatched = Arc::clone(&self.dispatched);

        Box::pin(async move {
            for item in items {
                dispatched.lock().unwrap().push(item.name.clone());

                completions
                    .send(run_work(item))
                    .await
                    .map_err(|e| anyhow::anyhow!("reactor closed: {e}"))?;
            }
            Ok(())
        })
    }
}
