// src/task/inputs.rs

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};

use crate::task::binding::BoundValue;
use crate::types::TaskValue;

/// Resolved inputs handed to a task's work function.
///
/// Positional inputs keep the order of the task's positional bindings;
/// named inputs are keyed by the binding name.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInputs<V> {
    pub args: Vec<V>,
    pub kwargs: BTreeMap<String, V>,
}

impl<V> Default for TaskInputs<V> {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }
}

impl<V> TaskInputs<V> {
    /// Positional input at `index`.
    pub fn arg(&self, index: usize) -> Result<&V> {
        self.args
            .get(index)
            .ok_or_else(|| anyhow!("missing positional input {index} (got {})", self.args.len()))
    }

    /// Named input, if bound.
    pub fn kwarg(&self, name: &str) -> Option<&V> {
        self.kwargs.get(name)
    }

    /// Named input that the work function cannot do without.
    pub fn required_kwarg(&self, name: &str) -> Result<&V> {
        self.kwarg(name)
            .ok_or_else(|| anyhow!("missing named input '{name}'"))
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

/// Inputs captured when a task is dispatched. Binding transforms have not
/// run yet; [`PendingInputs::resolve`] applies them on the worker.
pub struct PendingInputs<V> {
    pub(crate) args: Vec<BoundValue<V>>,
    pub(crate) kwargs: BTreeMap<String, BoundValue<V>>,
}

impl<V> Default for PendingInputs<V> {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }
}

impl<V: TaskValue> PendingInputs<V> {
    pub fn resolve(self) -> TaskInputs<V> {
        TaskInputs {
            args: self.args.into_iter().map(BoundValue::apply).collect(),
            kwargs: self
                .kwargs
                .into_iter()
                .map(|(name, bound)| (name, bound.apply()))
                .collect(),
        }
    }

    pub fn positional_len(&self) -> usize {
        self.args.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kwargs.keys().map(String::as_str)
    }
}

impl<V: Clone> Clone for PendingInputs<V> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            kwargs: self.kwargs.clone(),
        }
    }
}
