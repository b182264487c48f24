// src/exec/worker.rs

//! Individual work item runner.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, error};

use crate::dag::WorkItem;
use crate::engine::{Completion, TaskOutcome};
use crate::types::TaskValue;

/// Run one work item to completion on the current thread.
///
/// Binding transforms, the work function and postprocess run here in that
/// order. An error from the work function or a panic in any of the three
/// becomes [`TaskOutcome::Failed`]; nothing escapes to the caller.
pub fn run_work<V: TaskValue>(item: WorkItem<V>) -> Completion<V> {
    let WorkItem {
        id,
        name,
        work,
        inputs,
        postprocess,
    } = item;

    debug!(task = %name, "starting task work");
    let started = Instant::now();

    let body = || -> anyhow::Result<V> {
        let raw = work(inputs.resolve())?;
        Ok(match &postprocess {
            Some(postprocess) => postprocess(raw),
            None => raw,
        })
    };

    let outcome = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => {
            debug!(
                task = %name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "task work finished"
            );
            TaskOutcome::Success(value)
        }
        Ok(Err(err)) => {
            let message = format!("{err:#}");
            error!(task = %name, error = %message, "task work returned an error");
            TaskOutcome::Failed(message)
        }
        Err(payload) => {
            let message = format!("panicked: {}", panic_message(payload.as_ref()));
            error!(task = %name, error = %message, "task work panicked");
            TaskOutcome::Failed(message)
        }
    };

    Completion {
        id,
        task: name,
        outcome,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}
