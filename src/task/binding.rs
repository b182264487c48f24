// src/task/binding.rs

use std::fmt;
use std::sync::Arc;

use crate::errors::{Result, TaskdagError};
use crate::task::{Task, TransformFn};
use crate::types::{TaskName, TaskValue};

/// Directed edge from a dependent task to the task whose output it consumes.
///
/// The source is referenced by name and resolved to a concrete task when the
/// [`TaskGraph`](crate::dag::TaskGraph) is built. Bindings are immutable once
/// the graph exists.
pub struct Binding<V> {
    source: TaskName,
    /// `None` means identity.
    transform: Option<TransformFn<V>>,
}

impl<V: TaskValue> Binding<V> {
    /// Bind to the output of the task called `source`, unchanged.
    pub fn to(source: impl Into<TaskName>) -> Self {
        Self {
            source: source.into(),
            transform: None,
        }
    }

    /// Bind to the output of `task`, unchanged.
    pub fn of(task: &Task<V>) -> Self {
        Self::to(task.name())
    }

    /// Apply `transform` to the source output before handing it to the
    /// dependent's work function.
    pub fn map<F>(mut self, transform: F) -> Self
    where
        F: Fn(&V) -> V + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Produce the value this binding contributes to its dependent.
    ///
    /// `source` must be the task this binding points at and must have
    /// completed; otherwise [`TaskdagError::UnresolvedBinding`] is returned.
    pub fn resolve(&self, source: &Task<V>) -> Result<V> {
        Ok(self.capture(source)?.apply())
    }

    /// Copy the source output without applying the transform yet, so the
    /// transform can run on a worker.
    pub(crate) fn capture(&self, source: &Task<V>) -> Result<BoundValue<V>> {
        let output = source
            .output()
            .map_err(|_| TaskdagError::UnresolvedBinding {
                source_task: self.source.clone(),
            })?;

        Ok(BoundValue {
            value: output.clone(),
            transform: self.transform.clone(),
        })
    }
}

/// A source output captured for one binding, transform still pending.
pub struct BoundValue<V> {
    value: V,
    transform: Option<TransformFn<V>>,
}

impl<V: TaskValue> BoundValue<V> {
    pub fn apply(self) -> V {
        match &self.transform {
            Some(transform) => transform(&self.value),
            None => self.value,
        }
    }
}

impl<V: Clone> Clone for BoundValue<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            transform: self.transform.clone(),
        }
    }
}

impl<V> Clone for Binding<V> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            transform: self.transform.clone(),
        }
    }
}

impl<V> fmt::Debug for Binding<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("source", &self.source)
            .field("transformed", &self.transform.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(name: &str, value: &str) -> Task<String> {
        let mut task = Task::new(name, |_| Ok(String::new()));
        task.record_output(value.to_string());
        task
    }

    #[test]
    fn resolve_before_completion_is_an_error() {
        let source: Task<String> = Task::new("source", |_| Ok("x".to_string()));
        let binding = Binding::of(&source);

        match binding.resolve(&source) {
            Err(TaskdagError::UnresolvedBinding { source_task }) => assert_eq!(source_task, "source"),
            other => panic!("expected UnresolvedBinding, got {other:?}"),
        }
    }

    #[test]
    fn identity_binding_passes_output_through() {
        let source = completed("source", "Hello");
        assert_eq!(Binding::of(&source).resolve(&source).unwrap(), "Hello");
    }

    #[test]
    fn transform_is_applied_on_resolve() {
        let source = completed("source", "Hello");
        let binding = Binding::to("source").map(|v: &String| v.to_uppercase());
        assert_eq!(binding.resolve(&source).unwrap(), "HELLO");
        assert_eq!(binding.source(), "source");
    }

    #[test]
    fn captured_value_defers_the_transform() {
        let source = completed("source", "Hello");
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let binding = Binding::to("source").map(move |v: &String| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            format!("{v}!")
        });

        let bound = binding.capture(&source).unwrap();
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(bound.apply(), "Hello!");
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
