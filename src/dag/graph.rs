// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;

use crate::errors::{Result, TaskdagError};
use crate::task::{PendingInputs, Task};
use crate::types::{TaskId, TaskName, TaskValue};

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Direct dependencies: binding sources, first occurrence order.
    deps: Vec<TaskId>,
    /// Direct dependents: tasks binding to this one, declaration order.
    dependents: Vec<TaskId>,
}

/// The full set of tasks plus their bindings.
///
/// Tasks keep the order the caller declared them in; that order drives cycle
/// reporting and diagnostics. The graph is not structurally mutable once
/// built. Acyclicity is *not* checked here, see [`crate::dag::cycle`].
pub struct TaskGraph<V> {
    tasks: Vec<Task<V>>,
    nodes: Vec<DagNode>,
    index: HashMap<TaskName, TaskId>,
}

impl<V: TaskValue> TaskGraph<V> {
    /// Build a graph, naming unnamed tasks and resolving binding sources.
    ///
    /// Fails on duplicate names or bindings to tasks outside the set.
    pub fn new(tasks: impl IntoIterator<Item = Task<V>>) -> Result<Self> {
        let mut tasks: Vec<Task<V>> = tasks.into_iter().collect();
        let mut index = HashMap::with_capacity(tasks.len());

        // First pass: names.
        for (i, task) in tasks.iter_mut().enumerate() {
            if task.name().is_empty() {
                task.set_name(format!("task_{i}"));
            }
            if index.insert(task.name().to_string(), TaskId(i)).is_some() {
                return Err(TaskdagError::DuplicateTask(task.name().to_string()));
            }
        }

        // Second pass: dependencies, then dependents based on deps.
        let mut nodes = vec![DagNode::default(); tasks.len()];
        for (i, task) in tasks.iter().enumerate() {
            for binding in task.bindings() {
                let dep = *index.get(binding.source()).ok_or_else(|| {
                    TaskdagError::UnknownDependency {
                        task: task.name().to_string(),
                        dependency: binding.source().to_string(),
                    }
                })?;
                if !nodes[i].deps.contains(&dep) {
                    nodes[i].deps.push(dep);
                }
            }
        }
        for i in 0..nodes.len() {
            for dep in nodes[i].deps.clone() {
                nodes[dep.0].dependents.push(TaskId(i));
            }
        }

        Ok(Self {
            tasks,
            nodes,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + use<V> {
        (0..self.tasks.len()).map(TaskId)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task<V>> {
        self.tasks.iter()
    }

    pub fn task(&self, id: TaskId) -> &Task<V> {
        &self.tasks[id.0]
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> &mut Task<V> {
        &mut self.tasks[id.0]
    }

    pub fn id_of(&self, name: &str) -> Option<TaskId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Task<V>> {
        self.id_of(name).map(|id| self.task(id))
    }

    pub fn name_of(&self, id: TaskId) -> &str {
        self.tasks[id.0].name()
    }

    /// Immediate dependencies of a task (its binding sources).
    pub fn dependencies_of(&self, id: TaskId) -> &[TaskId] {
        &self.nodes[id.0].deps
    }

    /// Immediate dependents of a task (tasks binding to it).
    pub fn dependents_of(&self, id: TaskId) -> &[TaskId] {
        &self.nodes[id.0].dependents
    }

    /// Whether every binding source of `id` has completed.
    pub fn deps_completed(&self, id: TaskId) -> bool {
        self.dependencies_of(id)
            .iter()
            .all(|dep| self.task(*dep).is_completed())
    }

    /// Tasks that may run before anything else completes: marked ready, or
    /// without any binding at all.
    pub fn is_entry(&self, id: TaskId) -> bool {
        self.task(id).is_initially_ready() || self.dependencies_of(id).is_empty()
    }

    /// Capture the source outputs every binding of `id` needs.
    pub(crate) fn capture_inputs(&self, id: TaskId) -> Result<PendingInputs<V>> {
        let task = self.task(id);
        let mut inputs = PendingInputs::default();

        for binding in task.positional_bindings() {
            inputs.args.push(binding.capture(self.source_of(binding.source())?)?);
        }
        for (name, binding) in task.named_bindings() {
            let bound = binding.capture(self.source_of(binding.source())?)?;
            inputs.kwargs.insert(name.clone(), bound);
        }

        Ok(inputs)
    }

    fn source_of(&self, name: &str) -> Result<&Task<V>> {
        self.get(name).ok_or_else(|| TaskdagError::UnresolvedBinding {
            source_task: name.to_string(),
        })
    }
}

impl<V> fmt::Debug for TaskGraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph")
            .field("tasks", &self.tasks)
            .field("nodes", &self.nodes)
            .finish()
    }
}
