// src/dag/mod.rs

//! Task graph representation, validation and scheduling.
//!
//! - [`graph`] holds the task set with dependency and dependent adjacency.
//! - [`cycle`] validates that the graph is acyclic before anything runs.
//! - [`scheduler`] contains the per-run state machine that decides which
//!   tasks are ready, claims them for workers, and handles completions.
//! - [`scheduler_step`] defines the result type for scheduler steps.
//! - [`work_item`] describes a task handed to a worker.
//! - [`summary`] is a read-only diagnostic report over a graph.

pub mod cycle;
pub mod graph;
pub mod scheduler;
pub mod scheduler_step;
pub mod summary;
pub mod work_item;

pub use cycle::{check_acyclic, find_cycle};
pub use graph::TaskGraph;
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
pub use summary::{GraphSummary, TaskSummary};
pub use work_item::WorkItem;
