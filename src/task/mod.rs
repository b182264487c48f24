// src/task/mod.rs

//! Task / binding data model.
//!
//! - [`definition`] holds [`Task`]: the work function, its input bindings,
//!   flags, and the per-run state owned by the scheduler once execution starts.
//! - [`binding`] holds [`Binding`]: an edge from a dependent task to a source
//!   task, with an optional transform applied to the source output.
//! - [`inputs`] holds [`TaskInputs`], the arguments handed to work, and
//!   [`PendingInputs`], the source outputs captured at dispatch.
//! - [`state`] holds the [`RunState`] lifecycle.

pub mod binding;
pub mod definition;
pub mod inputs;
pub mod state;

use std::sync::Arc;

pub use binding::{Binding, BoundValue};
pub use definition::Task;
pub use inputs::{PendingInputs, TaskInputs};
pub use state::RunState;

/// Caller-supplied unit of work.
pub type WorkFn<V> = Arc<dyn Fn(TaskInputs<V>) -> anyhow::Result<V> + Send + Sync>;

/// Transform applied to a source output when resolving a [`Binding`].
pub type TransformFn<V> = Arc<dyn Fn(&V) -> V + Send + Sync>;

/// Transform applied once to the raw work result before it becomes the
/// task's output.
pub type PostprocessFn<V> = Arc<dyn Fn(V) -> V + Send + Sync>;
