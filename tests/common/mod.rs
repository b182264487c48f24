#![allow(dead_code, unused_imports)]

pub use taskdag_test_utils::builders;
pub use taskdag_test_utils::{init_tracing, with_timeout, InlineBackend};

use taskdag::errors::Result;
use taskdag::{GraphRun, StreamItem, TaskdagError};
use taskdag::types::TaskValue;

/// Drain `run`, returning the streamed pairs and the terminal error, if any.
pub async fn drain<V: TaskValue>(run: &mut GraphRun<V>) -> (Vec<(V, String)>, Option<TaskdagError>) {
    let mut items = Vec::new();
    while let Some(item) = run.next().await {
        match item {
            Ok(item) => items.push(item.into_pair()),
            Err(err) => return (items, Some(err)),
        }
    }
    (items, None)
}

pub fn pairs<V>(items: Result<Vec<StreamItem<V>>>) -> Vec<(V, String)> {
    items
        .expect("run should succeed")
        .into_iter()
        .map(StreamItem::into_pair)
        .collect()
}
